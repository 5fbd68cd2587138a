//! # vds-core
//!
//! Core types and utilities for talking to a RadiantOne VDS REST gateway.
//!
//! This crate provides the shared error type, client configuration, authentication
//! modes and HTTP helpers used by the VDS REST client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP failure mapping
//! - [`auth`] - Basic and bearer authentication modes
//! - [`config`] - Environment-sourced client configuration with validation
//! - [`types`] - Search scopes and search strategies
//! - [`query`] - Query parameter builder
//! - [`client`] - HTTP client construction and shared constants

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use auth::Auth;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::{SearchScope, SearchStrategy};
