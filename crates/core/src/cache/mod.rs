//! SQLite-backed cache for aggregated phone lookups.
//!
//! This module provides a persistent cache keyed by the raw phone number
//! string, with async access via tokio-rusqlite. It supports:
//!
//! - Exact-match get and atomic upsert of whole records
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Explicit maintenance (single-key delete, age-based purge)

pub mod connection;
pub mod migrations;
pub mod records;

pub use crate::Error;

pub use connection::CacheDb;
pub use records::{NO_SPAM_DATA, NOT_AVAILABLE, PhoneRecord, PhoneStore, UNKNOWN_NAME};
