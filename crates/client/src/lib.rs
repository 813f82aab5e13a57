//! Provider clients and the lookup pipeline for phonecheck.
//!
//! This crate provides the HTTP provider clients, the cache-aside
//! `Aggregator` that ties them to the cache store, and the reply rendering
//! shared by the server and CLI.

pub mod lookup;
pub mod providers;
pub mod reply;

pub use lookup::{Aggregator, Lookup, LookupError, Source};
pub use providers::{
    IdentityProvider, NumlookupClient, OpencnamClient, ProviderError, SpamProvider, SpamcallsClient, Validation,
    ValidationProvider,
};
pub use reply::{Command, render_outcome, respond};
