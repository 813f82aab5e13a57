//! Core types and shared functionality for phonecheck.
//!
//! This crate provides:
//! - The `PhoneRecord` entity and its SQLite-backed cache store
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, PhoneRecord, PhoneStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
