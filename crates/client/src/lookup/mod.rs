//! Cache-aside lookup pipeline.
//!
//! ```text
//! CheckCache ─hit──────────────────────────────────────────► ReturnCached
//!     │ miss
//!     ▼
//! Validate ─transport error─► ServiceUnavailable
//!     │    ─valid=false─────► InvalidNumber
//!     ▼
//! Enrich (identity ∥ spam, each bounded, each degradable) ─► Persist ─► ReturnFresh
//! ```
//!
//! Nothing is written to the store unless validation succeeded. Failures of
//! the two best-effort providers turn into sentinel fields and a `warn` log.

pub mod merge;

pub use merge::merge;

use crate::providers::{
    IdentityProvider, NumlookupClient, OpencnamClient, ProviderError, SpamProvider, SpamcallsClient,
    ValidationProvider,
};
use chrono::Utc;
use phonecheck_core::{AppConfig, Error, PhoneRecord, PhoneStore};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default per-call bound for the best-effort providers.
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a returned record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cached,
    Fresh,
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub record: PhoneRecord,
    pub source: Source,
}

/// Terminal lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Input does not start with `+`. No I/O was performed.
    #[error("number must start with + and a country code")]
    MalformedInput,

    /// The validation provider rejected the number.
    #[error("invalid or unrecognized number")]
    InvalidNumber,

    /// The validation provider could not be reached or answered garbage.
    #[error("validation provider unavailable: {0}")]
    ServiceUnavailable(#[source] ProviderError),

    /// The cache store failed on read or write.
    #[error("cache store unavailable: {0}")]
    StoreUnavailable(#[source] Error),
}

/// Orchestrates cache check, provider calls, merge and persist.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn PhoneStore>,
    validation: Arc<dyn ValidationProvider>,
    identity: Arc<dyn IdentityProvider>,
    spam: Arc<dyn SpamProvider>,
    enrichment_timeout: Duration,
    max_age: Option<chrono::Duration>,
}

impl Aggregator {
    pub fn new(
        store: Arc<dyn PhoneStore>, validation: Arc<dyn ValidationProvider>, identity: Arc<dyn IdentityProvider>,
        spam: Arc<dyn SpamProvider>,
    ) -> Self {
        Self { store, validation, identity, spam, enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT, max_age: None }
    }

    /// Wire the real HTTP providers from the application config.
    pub fn from_config(config: &AppConfig, store: Arc<dyn PhoneStore>) -> Result<Self, ProviderError> {
        Ok(Self::new(
            store,
            Arc::new(NumlookupClient::new(config)?),
            Arc::new(OpencnamClient::new(config)?),
            Arc::new(SpamcallsClient::new(config)?),
        )
        .with_enrichment_timeout(config.enrichment_timeout())
        .with_max_age(config.cache_max_age()))
    }

    pub fn with_enrichment_timeout(mut self, timeout: Duration) -> Self {
        self.enrichment_timeout = timeout;
        self
    }

    /// Treat cached records older than `max_age` as misses.
    ///
    /// `None` (the default) serves cached records indefinitely.
    pub fn with_max_age(mut self, max_age: Option<chrono::Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Look up one number.
    ///
    /// `number` must already be trimmed; it is used verbatim as the cache key.
    pub async fn lookup(&self, number: &str) -> Result<Lookup, LookupError> {
        if !number.starts_with('+') {
            return Err(LookupError::MalformedInput);
        }

        if let Some(record) = self.cached(number).await? {
            tracing::debug!(number, "cache hit");
            return Ok(Lookup { record, source: Source::Cached });
        }

        let start = Instant::now();
        let validation = self.validation.validate(number).await.map_err(|e| {
            tracing::warn!(number, error = %e, "validation provider unavailable");
            LookupError::ServiceUnavailable(e)
        })?;

        if !validation.valid {
            tracing::debug!(number, "number rejected by validation provider");
            return Err(LookupError::InvalidNumber);
        }

        let (name, spam_score) = tokio::join!(
            best_effort("identity", number, self.enrichment_timeout, self.identity.caller_name(number)),
            best_effort("spam", number, self.enrichment_timeout, self.spam.spam_score(number)),
        );

        let record = merge(number, validation, name, spam_score, Utc::now());

        self.store.put(&record).await.map_err(|e| {
            tracing::error!(number, error = %e, "failed to persist lookup");
            LookupError::StoreUnavailable(e)
        })?;

        tracing::debug!(number, elapsed = ?start.elapsed(), "fresh lookup stored");
        Ok(Lookup { record, source: Source::Fresh })
    }

    async fn cached(&self, number: &str) -> Result<Option<PhoneRecord>, LookupError> {
        let record = match self.store.get(number).await {
            Ok(record) => record,
            Err(e @ Error::CorruptRecord { .. }) => {
                tracing::warn!(number, error = %e, "unreadable cache row, refreshing");
                None
            }
            Err(e) => {
                tracing::error!(number, error = %e, "failed to read cache");
                return Err(LookupError::StoreUnavailable(e));
            }
        };

        Ok(match (record, self.max_age) {
            (Some(record), Some(max_age)) if record.age(Utc::now()) > max_age => {
                tracing::debug!(number, last_checked = %record.last_checked, "cached record expired");
                None
            }
            (record, _) => record,
        })
    }
}

/// Run one best-effort provider call under its own timeout.
///
/// Any failure becomes `None`; nothing propagates to the caller.
async fn best_effort<F>(provider: &'static str, number: &str, timeout: Duration, call: F) -> Option<String>
where
    F: Future<Output = Result<String, ProviderError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            tracing::warn!(provider, number, error = %e, "enrichment degraded");
            None
        }
        Err(_) => {
            tracing::warn!(provider, number, ?timeout, "enrichment timed out");
            None
        }
    }
}
