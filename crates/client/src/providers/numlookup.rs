//! numlookupapi validation client.
//!
//! `GET {base}/validate/{number}?apikey=...` returning
//! `{valid, international_format, country_name, carrier, line_type}`.

use super::{ProviderError, Validation, ValidationProvider, endpoint, get_json, http_client, non_empty};
use async_trait::async_trait;
use phonecheck_core::AppConfig;
use serde::Deserialize;

/// Raw response from the validate endpoint.
///
/// Every field is routinely missing, null or empty for numbers the provider
/// knows little about.
#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub international_format: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub line_type: Option<String>,
}

impl From<ValidateResponse> for Validation {
    fn from(raw: ValidateResponse) -> Self {
        Validation {
            valid: raw.valid.unwrap_or(false),
            international_format: non_empty(raw.international_format),
            country_name: non_empty(raw.country_name),
            carrier: non_empty(raw.carrier),
            line_type: non_empty(raw.line_type),
        }
    }
}

/// Validation provider client.
#[derive(Debug, Clone)]
pub struct NumlookupClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NumlookupClient {
    /// Create a client from the application config.
    ///
    /// Uses `timeout_ms` for the request timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey("numlookupapi"));
        }

        Ok(Self {
            http: http_client(&config.user_agent, config.timeout())?,
            base_url: config.validation_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ValidationProvider for NumlookupClient {
    async fn validate(&self, number: &str) -> Result<Validation, ProviderError> {
        let url = endpoint(&self.base_url, &["validate", number])?;
        tracing::debug!(number, "validating number");

        let request = self.http.get(url).query(&[("apikey", self.api_key.as_str())]);
        let response: ValidateResponse = get_json("numlookupapi", request).await?;

        Ok(response.into())
    }
}
