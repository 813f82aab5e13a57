//! cache_get tool implementation.
//!
//! Retrieves a cached record by its exact number key, without calling any
//! provider.

use phonecheck_core::{CacheDb, Error, PhoneRecord};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The number key, exactly as it was looked up.
    pub number: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// The cached record.
    pub record: PhoneRecord,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &CacheDb, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let record = cache
        .get_record(params.number.trim())
        .await?
        .ok_or_else(|| Error::CacheMiss(params.number.clone()))?;

    let output = CacheGetOutput { record };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize record: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
