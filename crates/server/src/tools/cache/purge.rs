//! cache_purge tool implementation.
//!
//! Removes cached records by number or by age. The lookup pipeline never
//! deletes anything on its own; this is the explicit way to force a fresh
//! lookup.

use phonecheck_core::{CacheDb, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Remove the record for exactly this number key.
    pub number: Option<String>,

    /// Remove records last checked more than this many days ago.
    pub older_than_days: Option<i64>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Number of entries left in the cache.
    pub remaining: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.number.is_none() && params.older_than_days.is_none() {
        return Err(Error::InvalidInput("At least one of number or older_than_days must be specified".to_string()).into());
    }

    let max_age = match params.older_than_days {
        Some(days) if days < 0 => {
            return Err(Error::InvalidInput(format!("older_than_days must not be negative, got {days}")).into());
        }
        Some(days) => Some(
            chrono::Duration::try_days(days)
                .ok_or_else(|| Error::InvalidInput(format!("older_than_days out of range: {days}")))?,
        ),
        None => None,
    };

    let mut deleted_total = 0u64;

    if let Some(number) = params.number
        && cache.delete_record(number.trim()).await?
    {
        deleted_total += 1;
    }

    if let Some(max_age) = max_age {
        deleted_total += cache.purge_older_than(max_age).await?;
    }

    tracing::info!(deleted = deleted_total, "purged phone cache");

    let output = CachePurgeOutput { deleted: deleted_total, remaining: cache.count_records().await? };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
