//! phone_lookup tool implementation.
//!
//! Runs the cache-aside lookup pipeline for one number.

use phonecheck_client::reply::{render_error, render_lookup};
use phonecheck_client::{Aggregator, Source};
use phonecheck_core::PhoneRecord;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for phone_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhoneLookupParams {
    /// Phone number in international format, starting with `+` and the country code.
    pub number: String,
}

/// Structured output for phone_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhoneLookupOutput {
    /// The aggregated record.
    pub record: PhoneRecord,
    /// Whether the record was served from the cache.
    pub cache_hit: bool,
}

/// Implementation of the phone_lookup tool.
///
/// Lookup failures are tool errors carrying the same one-line message a chat
/// user would see.
pub async fn lookup_impl(aggregator: &Aggregator, params: PhoneLookupParams) -> Result<CallToolResult, McpError> {
    let number = params.number.trim();

    match aggregator.lookup(number).await {
        Ok(lookup) => {
            let text = render_lookup(&lookup);
            let output = PhoneLookupOutput { cache_hit: lookup.source == Source::Cached, record: lookup.record };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| McpError::internal_error(format!("failed to serialize record: {e}"), None))?;

            Ok(CallToolResult::success(vec![Content::text(text), Content::text(json)]))
        }
        Err(err) => {
            tracing::debug!(number, error = %err, "phone lookup failed");
            Ok(CallToolResult::error(vec![Content::text(render_error(&err))]))
        }
    }
}
