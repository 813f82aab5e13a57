//! OpenCNAM caller-name client.

use super::{IdentityProvider, ProviderError, endpoint, get_json, http_client, non_empty};
use async_trait::async_trait;
use phonecheck_core::AppConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PhoneResponse {
    #[serde(default)]
    pub name: Option<String>,
}

/// Caller-name provider client.
#[derive(Debug, Clone)]
pub struct OpencnamClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpencnamClient {
    /// Create a client using `enrichment_timeout_ms` as the request timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: http_client(&config.user_agent, config.enrichment_timeout())?,
            base_url: config.identity_base_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for OpencnamClient {
    async fn caller_name(&self, number: &str) -> Result<String, ProviderError> {
        let url = endpoint(&self.base_url, &["phone", number])?;
        let response: PhoneResponse = get_json("opencnam", self.http.get(url)).await?;
        non_empty(response.name).ok_or(ProviderError::MissingField("name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::{REFUSED_BASE_URL, serve_once};

    fn client(base_url: &str) -> OpencnamClient {
        OpencnamClient::new(&AppConfig { identity_base_url: base_url.into(), ..Default::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_caller_name() {
        let (base_url, request_line) = serve_once(200, r#"{"name": "Jane Doe", "number": "+14155552671"}"#).await;

        let name = client(&base_url).caller_name("+14155552671").await.unwrap();
        assert_eq!(name, "Jane Doe");
        assert!(request_line.await.unwrap().starts_with("GET /phone/+14155552671 "));
    }

    #[tokio::test]
    async fn test_missing_name_field() {
        let (base_url, _) = serve_once(200, r#"{"number": "+14155552671"}"#).await;

        let result = client(&base_url).caller_name("+14155552671").await;
        assert!(matches!(result, Err(ProviderError::MissingField("name"))));
    }

    #[tokio::test]
    async fn test_blank_name_is_missing() {
        let (base_url, _) = serve_once(200, r#"{"name": "  "}"#).await;

        let result = client(&base_url).caller_name("+14155552671").await;
        assert!(matches!(result, Err(ProviderError::MissingField("name"))));
    }

    #[tokio::test]
    async fn test_non_200_status() {
        let (base_url, _) = serve_once(404, r#"{"name": "ignored"}"#).await;

        let result = client(&base_url).caller_name("+14155552671").await;
        assert!(matches!(result, Err(ProviderError::HttpError { status: 404 })));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let result = client(REFUSED_BASE_URL).caller_name("+14155552671").await;
        assert!(result.is_err());
    }
}
