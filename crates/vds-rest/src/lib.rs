//! VDS REST client and search models for RadiantOne directory gateways.
//!
//! Provides root discovery, the search strategies exposed by the gateway, and a
//! small runner that drives one connect-and-search cycle for command-line use.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod runner;

pub use client::{DirectoryRestClient, DirectoryRestClientBuilder};
pub use models::{JsonSearchBody, ProbeDescriptor, SearchRequest, PROBE_PATHS};
pub use runner::{render_result, run_query, DirectoryService, QueryOutcome};

/// Convenient result alias that reuses the shared VDS error type.
pub type Result<T> = vds_core::Result<T>;
