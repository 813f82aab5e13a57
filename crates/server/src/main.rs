//! phonecheck MCP server entry point.
//!
//! Boots the lookup pipeline and serves it on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use phonecheck_client::Aggregator;
use phonecheck_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let cache = CacheDb::open(&config.db_path).await?;
    let aggregator = Aggregator::from_config(&config, Arc::new(cache.clone()))?;

    tracing::info!(db_path = %config.db_path.display(), "Starting phonecheck server on stdio transport");

    let handler = handler::PhonecheckServer::new(aggregator, cache);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
