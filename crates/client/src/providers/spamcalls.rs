//! spamcalls.net spam score client.
//!
//! The score comes back either as a string (`"2%"`) or as a bare number
//! depending on the record; both are normalized to text.

use super::{ProviderError, SpamProvider, endpoint, get_json, http_client};
use async_trait::async_trait;
use phonecheck_core::AppConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SpamScore {
    Text(String),
    Number(serde_json::Number),
}

impl SpamScore {
    fn into_text(self) -> Option<String> {
        match self {
            SpamScore::Text(s) if s.trim().is_empty() => None,
            SpamScore::Text(s) => Some(s.trim().to_string()),
            SpamScore::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub spam_score: Option<SpamScore>,
}

/// Spam score provider client.
#[derive(Debug, Clone)]
pub struct SpamcallsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpamcallsClient {
    /// Create a client using `enrichment_timeout_ms` as the request timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: http_client(&config.user_agent, config.enrichment_timeout())?,
            base_url: config.spam_base_url.clone(),
        })
    }
}

#[async_trait]
impl SpamProvider for SpamcallsClient {
    async fn spam_score(&self, number: &str) -> Result<String, ProviderError> {
        let url = endpoint(&self.base_url, &["check", number])?;
        let request = self.http.get(url).query(&[("format", "json")]);
        let response: CheckResponse = get_json("spamcalls", request).await?;

        response
            .spam_score
            .and_then(SpamScore::into_text)
            .ok_or(ProviderError::MissingField("spam_score"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::serve_once;

    fn client(base_url: &str) -> SpamcallsClient {
        SpamcallsClient::new(&AppConfig { spam_base_url: base_url.into(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_score_as_string_or_number() {
        let text: CheckResponse = serde_json::from_str(r#"{"spam_score": "2%"}"#).unwrap();
        assert_eq!(text.spam_score.and_then(SpamScore::into_text).as_deref(), Some("2%"));

        let number: CheckResponse = serde_json::from_str(r#"{"spam_score": 87}"#).unwrap();
        assert_eq!(number.spam_score.and_then(SpamScore::into_text).as_deref(), Some("87"));

        let missing: CheckResponse = serde_json::from_str(r#"{"status": "unknown"}"#).unwrap();
        assert!(missing.spam_score.is_none());
    }

    #[tokio::test]
    async fn test_spam_score_over_http() {
        let (base_url, request_line) = serve_once(200, r#"{"spam_score": "2%"}"#).await;

        let score = client(&base_url).spam_score("+14155552671").await.unwrap();
        assert_eq!(score, "2%");
        assert!(request_line.await.unwrap().starts_with("GET /check/+14155552671?format=json "));
    }

    #[tokio::test]
    async fn test_null_score_is_missing() {
        let (base_url, _) = serve_once(200, r#"{"spam_score": null}"#).await;

        let result = client(&base_url).spam_score("+14155552671").await;
        assert!(matches!(result, Err(ProviderError::MissingField("spam_score"))));
    }

    #[tokio::test]
    async fn test_server_error() {
        let (base_url, _) = serve_once(503, "{}").await;

        let result = client(&base_url).spam_score("+14155552671").await;
        assert!(matches!(result, Err(ProviderError::HttpError { status: 503 })));
    }
}
