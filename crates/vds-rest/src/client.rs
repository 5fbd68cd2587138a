//! Asynchronous VDS REST client implementation.

use crate::models::{ProbeDescriptor, SearchRequest};
use crate::Result;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};
use url::Url;
use vds_core::client::build_http_client;
use vds_core::{ClientConfig, Error, SearchStrategy};

const USER_AGENT: &str = concat!("vds-rest/", env!("CARGO_PKG_VERSION"));

/// Builder for [`DirectoryRestClient`].
#[derive(Debug, Clone)]
pub struct DirectoryRestClientBuilder {
    config: ClientConfig,
    user_agent: String,
}

impl DirectoryRestClientBuilder {
    /// Create a builder from a [`ClientConfig`].
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the search strategy from the configuration.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.config = self.config.with_strategy(strategy);
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<DirectoryRestClient> {
        let config = self.config.validated()?;
        let http = build_http_client(&config, &self.user_agent)?;

        Ok(DirectoryRestClient {
            http,
            config: Arc::new(config),
        })
    }
}

/// Asynchronous client for a RadiantOne VDS REST gateway.
#[derive(Clone)]
pub struct DirectoryRestClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl DirectoryRestClient {
    /// Construct a client directly from the configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        DirectoryRestClientBuilder::new(config).build()
    }

    /// Construct a client from `VDS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ClientConfig) -> DirectoryRestClientBuilder {
        DirectoryRestClientBuilder::new(config)
    }

    /// Access the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Find the first REST root that answers a probe with HTTP 200.
    ///
    /// Probe failures are logged and skipped; `None` means no root answered.
    pub async fn discover_root(&self) -> Option<String> {
        match self.try_discover_root().await {
            Ok(root) => Some(root),
            Err(err) => {
                debug!(error = %err, "REST root discovery failed");
                None
            }
        }
    }

    /// Find the first REST root that answers a probe with HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotFound`] if every probe fails.
    pub async fn try_discover_root(&self) -> Result<String> {
        for probe in ProbeDescriptor::sequence(&self.config.rest_roots) {
            match self.probe(probe).await {
                Ok(status) if status == StatusCode::OK => {
                    info!(
                        root = probe.root,
                        probe = probe.path,
                        "Detected REST root at {} (probe {} OK)",
                        probe.root,
                        probe.path
                    );
                    return Ok(probe.root.to_string());
                }
                Ok(status) => {
                    debug!(probe = %probe, %status, "REST root probe rejected");
                }
                Err(err) => {
                    debug!(probe = %probe, error = %err, "REST root probe failed");
                }
            }
        }

        Err(Error::RootNotFound(format!(
            "no REST root under {} responded to ping/info probes",
            self.config.base_url
        )))
    }

    /// Check that the gateway is reachable through one of the REST roots.
    pub async fn test_connection(&self) -> bool {
        match self.try_discover_root().await {
            Ok(root) => {
                info!(root = %root, "Connected to RadiantOne VDS REST successfully");
                true
            }
            Err(err) => {
                error!(error = %err, "No REST root responded to ping/info probes");
                false
            }
        }
    }

    /// Run a search and return the parsed JSON body.
    ///
    /// Failures are logged with their status code and a truncated body; `None`
    /// is returned for any non-200 response, transport error, or when no REST
    /// root could be discovered.
    pub async fn search(&self, request: &SearchRequest) -> Option<Value> {
        match self.try_search(request).await {
            Ok(value) => Some(value),
            Err(Error::RootNotFound(reason)) => {
                error!(%reason, "Cannot run search, REST root not detected");
                None
            }
            Err(Error::SearchFailed { status, body }) => {
                error!(status, "Search failed {status}: {body}");
                None
            }
            Err(err) => {
                error!(code = err.error_code(), "HTTP error: {err}");
                None
            }
        }
    }

    /// Run a search using the configured strategy.
    ///
    /// Strategies addressed under a REST root discover it first; no search request
    /// is sent when discovery fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotFound`] when discovery fails, [`Error::SearchFailed`]
    /// for non-200 responses, or a transport/parse error.
    pub async fn try_search(&self, request: &SearchRequest) -> Result<Value> {
        request.ensure_valid()?;

        if self.config.strategy.requires_root() {
            let root = self.try_discover_root().await?;
            self.try_search_with_root(&root, request).await
        } else {
            self.adap_search(request).await
        }
    }

    /// Run a search under an already resolved REST root.
    ///
    /// The ADAP strategy is addressed on the host and ignores `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchFailed`] for non-200 responses, or a
    /// transport/parse error.
    pub async fn try_search_with_root(&self, root: &str, request: &SearchRequest) -> Result<Value> {
        request.ensure_valid()?;

        let builder = match self.config.strategy {
            SearchStrategy::QueryParams => {
                let url = self.config.endpoint_url(root, "/ldap/search")?;
                self.request(Method::GET, url)
                    .query(request.to_query_params().as_pairs())
            }
            SearchStrategy::JsonBody => {
                let url = self.config.endpoint_url(root, "/rest/search")?;
                self.request(Method::POST, url).json(&request.to_json_body())
            }
            SearchStrategy::Adap => return self.adap_search(request).await,
        };

        debug!(
            root,
            strategy = %self.config.strategy,
            base = %request.base_dn,
            filter = %request.filter,
            "Sending VDS search"
        );
        read_search_response(builder.send().await?).await
    }

    async fn adap_search(&self, request: &SearchRequest) -> Result<Value> {
        let url = self.adap_url(&request.base_dn)?;
        debug!(url = %url, filter = %request.filter, "Sending VDS ADAP search");
        let response = self
            .request(Method::GET, url)
            .query(request.to_adap_params().as_pairs())
            .send()
            .await?;
        read_search_response(response).await
    }

    fn adap_url(&self, base_dn: &str) -> Result<Url> {
        let mut url = self.config.parse_base_url()?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!(
                    "VDS base URL `{}` cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push("adap")
            .push(base_dn);
        Ok(url)
    }

    async fn probe(&self, probe: ProbeDescriptor<'_>) -> Result<StatusCode> {
        let url = self.config.endpoint_url(probe.root, probe.path)?;
        let response = self.request(Method::GET, url).send().await?;
        Ok(response.status())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        self.config.auth.apply(request)
    }
}

async fn read_search_response(response: Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::OK {
        return response
            .json::<Value>()
            .await
            .map_err(|err| Error::ParseError(format!("Failed to parse VDS search response: {err}")));
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(Error::search_failed(status, &body))
}
