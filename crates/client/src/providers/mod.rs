//! Phone lookup provider clients.
//!
//! Three independent HTTP JSON providers feed one lookup:
//!
//! - **Validation** (numlookupapi): authoritative. Decides validity and
//!   supplies the formatted number, country, carrier and line type.
//! - **Identity** (OpenCNAM): best-effort caller name.
//! - **Spam** (spamcalls): best-effort spam score.
//!
//! Each client is a thin typed wrapper over `reqwest` that returns
//! `Result<_, ProviderError>`. Policy (terminate vs. degrade) lives in the
//! lookup pipeline, not here. The traits below are the seam that lets the
//! pipeline run against mocks.

pub mod error;
pub mod numlookup;
pub mod opencnam;
pub mod spamcalls;

pub use error::ProviderError;
pub use numlookup::NumlookupClient;
pub use opencnam::OpencnamClient;
pub use spamcalls::SpamcallsClient;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use url::Url;

/// Normalized answer from the validation provider.
///
/// Optional attributes are `None` when the provider omitted them or sent an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub international_format: Option<String>,
    pub country_name: Option<String>,
    pub carrier: Option<String>,
    pub line_type: Option<String>,
}

/// Authoritative number validation.
#[async_trait]
pub trait ValidationProvider: Send + Sync {
    async fn validate(&self, number: &str) -> Result<Validation, ProviderError>;
}

/// Best-effort caller name lookup.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn caller_name(&self, number: &str) -> Result<String, ProviderError>;
}

/// Best-effort spam score lookup.
#[async_trait]
pub trait SpamProvider: Send + Sync {
    async fn spam_score(&self, number: &str) -> Result<String, ProviderError>;
}

/// Build the shared HTTP client for one provider.
pub(crate) fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| ProviderError::ClientBuild(e.to_string()))
}

/// Append path segments to a provider base URL.
///
/// Segments are percent-encoded by `url`, so a number can never escape its
/// path segment.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url).map_err(|e| ProviderError::InvalidEndpoint(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidEndpoint(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a GET request and decode a 200 JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &'static str, request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let start = Instant::now();

    let response = request.header(header::ACCEPT, "application/json").send().await?;

    let status = response.status();
    tracing::debug!(provider, %status, elapsed = ?start.elapsed(), "provider response");

    if status != StatusCode::OK {
        return Err(ProviderError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Treat empty or whitespace-only provider strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! One-shot HTTP responder for exercising the real clients.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned response and report the request line.
    pub async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&buf);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (base_url, rx)
    }

    /// A base URL nothing listens on.
    pub const REFUSED_BASE_URL: &str = "http://127.0.0.1:9";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let url = endpoint("https://api.numlookupapi.com/v1", &["validate", "+14155552671"]).unwrap();
        assert_eq!(url.as_str(), "https://api.numlookupapi.com/v1/validate/+14155552671");
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let url = endpoint("https://api.opencnam.com/v3/", &["phone", "+14155552671"]).unwrap();
        assert_eq!(url.path(), "/v3/phone/+14155552671");
    }

    #[test]
    fn test_endpoint_encodes_path_breakouts() {
        let url = endpoint("https://spamcalls.net/api", &["check", "+1/../admin?x"]).unwrap();
        assert_eq!(url.path(), "/api/check/+1%2F..%2Fadmin%3Fx");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        assert!(matches!(endpoint("not a url", &["x"]), Err(ProviderError::InvalidEndpoint(_))));
        assert!(matches!(endpoint("mailto:ops@example.com", &["x"]), Err(ProviderError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client("phonecheck/0.1", Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(" Verizon ".into())), Some("Verizon".into()));
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
