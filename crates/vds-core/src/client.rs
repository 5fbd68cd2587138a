//! HTTP client utilities.
//!
//! This module provides the shared constants and the `reqwest` client construction
//! used by the VDS REST crates.

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;

/// Upper bound accepted for the request timeout in seconds.
pub const MAX_TIMEOUT_SECS: f64 = 600.0;

/// Maximum number of characters of an error response body kept for reporting.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Default maximum number of characters printed for a search result.
pub const DEFAULT_OUTPUT_LIMIT: usize = 5000;

/// Returns `text` cut to at most `limit` characters, on a character boundary.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(index, _)| &text[..index])
}

/// Build the HTTP client for a configuration.
///
/// The client carries the configured timeout, TLS policy and user agent. Connection
/// pooling is disabled so each request runs on a fresh connection.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or the
/// client cannot be constructed.
pub fn build_http_client(config: &ClientConfig, user_agent: &str) -> Result<Client> {
    let timeout = config.timeout();
    let mut builder = ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .pool_max_idle_per_host(0);

    if !config.tls_verify {
        warn!("TLS verification disabled for VDS client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(ca_cert) = &config.tls_ca_cert {
        debug!("loading VDS CA certificate from {}", ca_cert.display());
        let bytes = std::fs::read(ca_cert).map_err(|err| {
            Error::ConfigError(format!(
                "Failed to read VDS CA certificate {}: {err}",
                ca_cert.display()
            ))
        })?;
        let cert = reqwest::Certificate::from_pem(&bytes)
            .map_err(|err| Error::ConfigError(format!("Invalid VDS CA certificate: {err}")))?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|err| Error::ConfigError(format!("Failed to build VDS HTTP client: {err}")))
}
