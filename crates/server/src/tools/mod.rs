//! MCP tool implementations.
//!
//! This module contains all tools exposed by the phonecheck server.

pub mod cache;
pub mod phone_lookup;
