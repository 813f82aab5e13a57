//! phonecheck command-line front end.
//!
//! With a number argument, performs one lookup and prints the reply. Without
//! one, reads chat messages from stdin line by line and answers each on
//! stdout, the same way the bot would.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use phonecheck_client::{Aggregator, reply};
use phonecheck_core::{AppConfig, CacheDb};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "phonecheck")]
#[command(about = "Look up phone numbers: caller name, carrier, country and spam score", long_about = None)]
#[command(version)]
struct Cli {
    /// Number to look up, e.g. +14155552671. Omit to read messages from stdin.
    number: Option<String>,

    /// Override the cache database path from the config.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let cache = CacheDb::open(&config.db_path).await?;
    let aggregator = Aggregator::from_config(&config, Arc::new(cache))?;

    match cli.number {
        Some(number) => {
            let outcome = aggregator.lookup(number.trim()).await;
            println!("{}", reply::render_outcome(&outcome));
            if outcome.is_err() {
                std::process::exit(1);
            }
        }
        None => {
            tracing::info!(db_path = %config.db_path.display(), "reading messages from stdin");
            chat_loop(&aggregator, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
        }
    }

    Ok(())
}

/// Answer every input line until EOF. Replies are separated by a blank line.
async fn chat_loop<R, W>(aggregator: &Aggregator, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(text) = reply::respond(aggregator, &line).await {
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n\n").await?;
            output.flush().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn offline_aggregator() -> Aggregator {
        let config = AppConfig {
            api_key: "test-key".into(),
            validation_base_url: "http://127.0.0.1:9".into(),
            identity_base_url: "http://127.0.0.1:9".into(),
            spam_base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        let cache = CacheDb::open_in_memory().await.unwrap();
        Aggregator::from_config(&config, Arc::new(cache)).unwrap()
    }

    #[test]
    fn test_cli_parses_number() {
        let cli = Cli::try_parse_from(["phonecheck", "+14155552671"]).unwrap();
        assert_eq!(cli.number.as_deref(), Some("+14155552671"));
        assert!(cli.db.is_none());

        let cli = Cli::try_parse_from(["phonecheck", "--db", "/tmp/x.db"]).unwrap();
        assert!(cli.number.is_none());
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[tokio::test]
    async fn test_chat_loop_replies() {
        let aggregator = offline_aggregator().await;
        let input: &[u8] = b"/start\n\n/stats\nnotanumber\n/help\n";
        let mut output = Vec::new();

        chat_loop(&aggregator, input, &mut output).await.unwrap();

        let expected = format!("{}\n\n{}\n\n{}\n\n", reply::GREETING, reply::USAGE_HINT, reply::HELP);
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_chat_loop_provider_down() {
        let aggregator = offline_aggregator().await;
        let input: &[u8] = b"+14155552671\n";
        let mut output = Vec::new();

        chat_loop(&aggregator, input, &mut output).await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), format!("{}\n\n", reply::SERVICE_UNAVAILABLE));
    }
}
