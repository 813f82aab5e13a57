//! MCP server handler implementation.
//!
//! Routes tool calls to the lookup pipeline and the cache tools.
use crate::tools::cache::{CacheGetParams, CachePurgeParams, get_impl, purge_impl};
use crate::tools::phone_lookup::{PhoneLookupParams, lookup_impl};

use phonecheck_client::Aggregator;
use phonecheck_client::reply::HELP;
use phonecheck_core::CacheDb;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult, PaginatedRequestParam,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for phonecheck.
#[derive(Clone)]
pub struct PhonecheckServer {
    tool_router: ToolRouter<Self>,
    aggregator: Aggregator,
    cache: CacheDb,
}

#[tool_router]
impl PhonecheckServer {
    /// Create a handler over an aggregator and the cache it writes to.
    pub fn new(aggregator: Aggregator, cache: CacheDb) -> Self {
        Self { tool_router: Self::tool_router(), aggregator, cache }
    }

    #[tool(
        description = "Look up a phone number in international format (+countrycode number). Returns name, carrier, country, line type, spam score and whether the result came from the cache."
    )]
    async fn phone_lookup(&self, params: Parameters<PhoneLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.aggregator, params.0).await
    }

    #[tool(description = "Show usage help for phone lookups.")]
    async fn phone_help(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(HELP)]))
    }

    /// Read a cached record without touching any provider.
    #[tool(description = "Get a cached lookup record by its exact number key. Never calls a provider.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.cache, params.0).await
    }

    #[tool(
        description = "Delete cached records: one number, everything older than N days, or both. Returns deleted and remaining counts."
    )]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, params.0).await
    }
}

impl ServerHandler for PhonecheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "phonecheck".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(HELP.into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::aggregator_without_network;

    #[tokio::test]
    async fn test_registers_all_tools() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let server = PhonecheckServer::new(aggregator_without_network(&db), db);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["cache_get", "cache_purge", "phone_help", "phone_lookup"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let server = PhonecheckServer::new(aggregator_without_network(&db), db);

        let info = server.get_info();
        assert_eq!(info.server_info.name, "phonecheck");
        assert!(info.capabilities.tools.is_some());
    }
}
