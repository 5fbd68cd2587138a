//! One connect-and-search cycle, as run by the command-line tool.

use std::io::Write;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use vds_core::client::truncate_chars;

use crate::client::DirectoryRestClient;
use crate::models::SearchRequest;

/// Message written when a search produced no result.
pub const NO_RESULTS_MESSAGE: &str = "No results (or error).";

/// Directory operations needed to run a query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Returns true if searches are sent under a discovered REST root.
    fn requires_root(&self) -> bool;

    /// Returns true if the gateway answered a liveness probe.
    async fn test_connection(&self) -> bool;

    /// Runs a search, returning the parsed JSON body or `None` on failure.
    async fn search(&self, request: &SearchRequest) -> Option<Value>;
}

#[async_trait]
impl DirectoryService for DirectoryRestClient {
    fn requires_root(&self) -> bool {
        self.config().strategy.requires_root()
    }

    async fn test_connection(&self) -> bool {
        DirectoryRestClient::test_connection(self).await
    }

    async fn search(&self, request: &SearchRequest) -> Option<Value> {
        DirectoryRestClient::search(self, request).await
    }
}

/// Result of [`run_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The gateway could not be reached; no search was sent
    Unreachable,
    /// The search failed or returned nothing
    NoResults,
    /// A result was written to the output
    Printed,
}

impl QueryOutcome {
    /// Process exit code for the outcome.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Printed => 0,
            Self::Unreachable | Self::NoResults => 1,
        }
    }
}

/// Pretty-print `value`, keeping at most `max_chars` characters.
#[must_use]
pub fn render_result(value: &Value, max_chars: usize) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    truncate_chars(&pretty, max_chars).to_string()
}

/// Test the connection, run the search, and write the result to `out`.
///
/// Services that search under a REST root are connection-tested first, and
/// nothing is searched when that test fails.
///
/// # Errors
///
/// Returns an I/O error if writing to `out` fails.
pub async fn run_query<S, W>(
    service: &S,
    request: &SearchRequest,
    max_chars: usize,
    out: &mut W,
) -> std::io::Result<QueryOutcome>
where
    S: DirectoryService + ?Sized,
    W: Write,
{
    if service.requires_root() && !service.test_connection().await {
        return Ok(QueryOutcome::Unreachable);
    }

    match service.search(request).await {
        Some(value) => {
            writeln!(out, "{}", render_result(&value, max_chars))?;
            info!(base = %request.base_dn, "Search result written");
            Ok(QueryOutcome::Printed)
        }
        None => {
            writeln!(out, "{NO_RESULTS_MESSAGE}")?;
            Ok(QueryOutcome::NoResults)
        }
    }
}
