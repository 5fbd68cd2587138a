//! Configuration structures for VDS clients.
//!
//! [`ClientConfig`] is the explicit configuration passed to a client at construction.
//! It can be assembled with the builder methods or read from `VDS_*` environment
//! variables, and is validated before use.

use crate::auth::Auth;
use crate::client::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::types::SearchStrategy;
use crate::Error;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::{Validate, ValidationError};

/// Environment variable holding the gateway base URL.
pub const ENV_BASE_URL: &str = "VDS_BASE_URL";
/// Environment variable holding comma-separated REST root candidates.
pub const ENV_REST_ROOTS: &str = "VDS_REST_ROOTS";
/// Environment variable holding the basic-auth user name.
pub const ENV_USERNAME: &str = "VDS_USERNAME";
/// Environment variable holding the basic-auth password.
pub const ENV_PASSWORD: &str = "VDS_PASSWORD";
/// Environment variable holding the bearer token.
pub const ENV_BEARER_TOKEN: &str = "VDS_BEARER_TOKEN";
/// Environment variable toggling TLS certificate verification.
pub const ENV_SSL_VERIFY: &str = "VDS_SSL_VERIFY";
/// Environment variable holding an extra CA certificate path.
pub const ENV_CA_CERT: &str = "VDS_CA_CERT";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "VDS_TIMEOUT";
/// Environment variable selecting the search strategy.
pub const ENV_SEARCH_STRATEGY: &str = "VDS_SEARCH_STRATEGY";

/// Default gateway base URL.
pub const DEFAULT_BASE_URL: &str = "https://your-vds-host:8443";

/// Default REST root candidates, probed in this order.
pub const DEFAULT_REST_ROOTS: &[&str] = &["/vds/rest", "/rest", "/vds-server/rest"];

/// Configuration for a VDS REST client.
#[derive(Debug, Clone, Validate)]
pub struct ClientConfig {
    /// Gateway base URL (scheme, host and port)
    #[validate(url)]
    pub base_url: String,

    /// Candidate REST root prefixes, in probe order
    #[validate(length(min = 1), custom(function = "validate_rest_roots"))]
    pub rest_roots: Vec<String>,

    /// Credentials sent with every request
    pub auth: Auth,

    /// Whether to verify TLS certificates
    pub tls_verify: bool,

    /// Optional path to a custom CA certificate
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(exclusive_min = 0.0, max = 600.0))]
    pub timeout_secs: f64,

    /// How searches are sent to the gateway
    pub strategy: SearchStrategy,
}

#[allow(clippy::ptr_arg)]
fn validate_rest_roots(roots: &Vec<String>) -> Result<(), ValidationError> {
    if roots.iter().all(|root| root.starts_with('/')) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_rest_root");
        err.message = Some("REST roots must start with '/'".into());
        Err(err)
    }
}

impl ClientConfig {
    /// Create a new client configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config.validated()
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self, Error> {
        Self::read_env()?.validated()
    }

    /// Read the configuration from the process environment without validating it.
    ///
    /// Callers that layer further overrides on top should call
    /// [`ClientConfig::validated`] once they are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed.
    pub fn read_env() -> Result<Self, Error> {
        Self::read_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a variable lookup function.
    ///
    /// Unset variables fall back to their defaults. A bearer token takes precedence
    /// over basic credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::read_lookup(lookup)?.validated()
    }

    /// Like [`ClientConfig::from_lookup`], without the final validation.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed.
    pub fn read_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }

        if let Some(roots) = lookup(ENV_REST_ROOTS) {
            config.rest_roots = parse_list(&roots);
        }

        config.auth = Auth::select(
            lookup(ENV_USERNAME),
            lookup(ENV_PASSWORD),
            lookup(ENV_BEARER_TOKEN),
        );

        if let Some(verify) = lookup(ENV_SSL_VERIFY) {
            config.tls_verify = parse_flag(&verify);
        }

        if let Some(path) = lookup(ENV_CA_CERT).filter(|path| !path.is_empty()) {
            config.tls_ca_cert = Some(PathBuf::from(path));
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = timeout.trim().parse::<f64>().map_err(|err| {
                Error::ConfigError(format!("Invalid {ENV_TIMEOUT} `{timeout}`: {err}"))
            })?;
        }

        if let Some(strategy) = lookup(ENV_SEARCH_STRATEGY) {
            config.strategy = strategy
                .parse()
                .map_err(|err| Error::ConfigError(format!("Invalid {ENV_SEARCH_STRATEGY}: {err}")))?;
        }

        Ok(config)
    }

    /// Validate the configuration, returning it on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the failed checks.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Replace the REST root candidates.
    #[must_use]
    pub fn with_rest_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rest_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Set the credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Use HTTP basic credentials.
    #[must_use]
    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_auth(Auth::basic(username, password))
    }

    /// Use a bearer token.
    #[must_use]
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        self.with_auth(Auth::bearer(token))
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the search strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.clamp(0.0, MAX_TIMEOUT_SECS))
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid VDS base URL: {e}")))
    }

    /// Build the URL of `path` under the REST `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the result is not a valid URL.
    pub fn endpoint_url(&self, root: &str, path: &str) -> Result<Url, Error> {
        let raw = format!("{}{root}{path}", self.base_url.trim_end_matches('/'));
        Url::parse(&raw)
            .map_err(|e| Error::InvalidEndpoint(format!("Invalid VDS endpoint `{raw}`: {e}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            rest_roots: DEFAULT_REST_ROOTS.iter().map(ToString::to_string).collect(),
            auth: Auth::default(),
            tls_verify: false,
            tls_ca_cert: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            strategy: SearchStrategy::default(),
        }
    }
}

/// Interpret `1`, `true` and `yes` (any case) as enabled.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}
