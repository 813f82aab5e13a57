//! Chat command parsing and reply rendering.
//!
//! Both front ends speak the same little protocol: `/start` and `/help` get
//! static text, any other command is ignored, and everything else is a
//! number to look up. Every outcome renders to exactly one message; error
//! details stay in the logs.

use crate::lookup::{Aggregator, Lookup, LookupError, Source};

pub const GREETING: &str = "👋 Send any phone number with country code (e.g., +14155552671).\n\
                            I'll fetch name, spam score, and carrier info.";

pub const HELP: &str = "ℹ️ Use international format (+countrycode number). Cached lookups are faster!";

pub const USAGE_HINT: &str = "⚠️ Please include country code (e.g., +91).";

pub const INVALID_NUMBER: &str = "❌ Invalid or unrecognized number.";

pub const SERVICE_UNAVAILABLE: &str = "❌ Lookup service unavailable.";

pub const CACHE_UNAVAILABLE: &str = "❌ Lookup cache unavailable, please try again later.";

/// One incoming chat message, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// A command we don't handle. Gets no reply.
    Unknown(String),
    /// Plain text, trimmed, to be looked up.
    Lookup(String),
}

impl Command {
    /// Classify a message. `/start@somebot` style suffixes are accepted.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let Some(command) = text.strip_prefix('/') else {
            return Command::Lookup(text.to_string());
        };

        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default();

        match name {
            "start" => Command::Start,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Render a successful lookup.
///
/// Cached and fresh records differ only in the header line.
pub fn render_lookup(lookup: &Lookup) -> String {
    let header = match lookup.source {
        Source::Cached => "📞 *Cached Result*",
        Source::Fresh => "📞 *Lookup Result*",
    };
    let record = &lookup.record;

    format!(
        "{header}\n━━━━━━━━━━\n\
         👤 *Name:* {}\n\
         📱 *Number:* {}\n\
         🌍 *Country:* {}\n\
         📡 *Carrier:* {}\n\
         🔌 *Line Type:* {}\n\
         🧠 *Spam Score:* {}\n\
         ✅ *Active:* {}\n\
         🕓 Checked: {}",
        record.name,
        record.display_number,
        record.country,
        record.carrier,
        record.line_type,
        record.spam_score,
        if record.active { "Yes" } else { "No" },
        record.last_checked.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Render a failed lookup.
pub fn render_error(err: &LookupError) -> &'static str {
    match err {
        LookupError::MalformedInput => USAGE_HINT,
        LookupError::InvalidNumber => INVALID_NUMBER,
        LookupError::ServiceUnavailable(_) => SERVICE_UNAVAILABLE,
        LookupError::StoreUnavailable(_) => CACHE_UNAVAILABLE,
    }
}

pub fn render_outcome(outcome: &Result<Lookup, LookupError>) -> String {
    match outcome {
        Ok(lookup) => render_lookup(lookup),
        Err(err) => render_error(err).to_string(),
    }
}

/// Handle one chat message end to end.
///
/// Returns `None` for messages that get no reply.
pub async fn respond(aggregator: &Aggregator, text: &str) -> Option<String> {
    match Command::parse(text) {
        Command::Start => Some(GREETING.to_string()),
        Command::Help => Some(HELP.to_string()),
        Command::Unknown(name) => {
            tracing::debug!(command = %name, "ignoring unknown command");
            None
        }
        Command::Lookup(number) => Some(render_outcome(&aggregator.lookup(&number).await)),
    }
}
