//! Run an LDAP search through a RadiantOne VDS REST gateway and print the JSON result.
//!
//! ## Usage
//!
//! ```bash
//! # Connection settings come from VDS_* environment variables
//! export VDS_BASE_URL=https://vds.example.com:8443
//! export VDS_BEARER_TOKEN=...
//!
//! # Subtree search with selected attributes
//! vds-query "ou=targetou,dc=acme,dc=com" --filter "(cn=*)" --attributes cn,mail,uid --size-limit 25
//!
//! # POST-style search against a specific REST root
//! vds-query "dc=example,dc=com" --strategy json-body --root /rest
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vds_core::client::DEFAULT_OUTPUT_LIMIT;
use vds_core::{ClientConfig, SearchScope, SearchStrategy};
use vds_rest::models::{DEFAULT_FILTER, DEFAULT_SIZE_LIMIT};
use vds_rest::{run_query, DirectoryRestClient, QueryOutcome, SearchRequest};

/// Search a RadiantOne VDS directory over its REST gateway
#[derive(Parser, Debug)]
#[command(name = "vds-query", version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Base DN of the search
    #[arg(value_name = "BASE_DN")]
    base_dn: String,

    /// LDAP filter expression
    #[arg(short, long, default_value = DEFAULT_FILTER)]
    filter: String,

    /// Attributes to return (comma-separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    attributes: Vec<String>,

    /// Search scope: base, one, or sub
    #[arg(short, long, default_value_t = SearchScope::Subtree)]
    scope: SearchScope,

    /// Maximum number of entries returned
    #[arg(long, default_value_t = DEFAULT_SIZE_LIMIT)]
    size_limit: u32,

    /// Maximum search time in seconds (0 means no limit)
    #[arg(long, default_value_t = 0)]
    time_limit: u32,

    /// Search style: query-params, json-body, or adap [env: VDS_SEARCH_STRATEGY]
    #[arg(long)]
    strategy: Option<SearchStrategy>,

    /// Gateway base URL [env: VDS_BASE_URL]
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// REST root candidate, replaces the configured list (repeatable) [env: VDS_REST_ROOTS]
    #[arg(long = "root", value_name = "PREFIX")]
    roots: Vec<String>,

    /// Skip TLS certificate verification
    #[arg(long, conflicts_with = "verify_tls")]
    insecure: bool,

    /// Verify TLS certificates [env: VDS_SSL_VERIFY]
    #[arg(long)]
    verify_tls: bool,

    /// Request timeout in seconds [env: VDS_TIMEOUT]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Maximum number of characters of JSON printed
    #[arg(long, default_value_t = DEFAULT_OUTPUT_LIMIT)]
    max_output: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

const AFTER_HELP: &str = "\
ENVIRONMENT:
  VDS_BASE_URL         Gateway URL (default https://your-vds-host:8443)
  VDS_REST_ROOTS       Comma-separated REST roots (default /vds/rest,/rest,/vds-server/rest)
  VDS_USERNAME         Basic-auth bind DN (default \"cn=directory manager\")
  VDS_PASSWORD         Basic-auth password
  VDS_BEARER_TOKEN     Bearer token, used instead of basic auth when set
  VDS_SSL_VERIFY       1/true/yes to verify TLS certificates (default false)
  VDS_CA_CERT          Extra CA certificate (PEM)
  VDS_TIMEOUT          Request timeout in seconds (default 15)
  VDS_SEARCH_STRATEGY  query-params, json-body, or adap
";

impl Cli {
    /// Apply command-line overrides on top of the environment configuration, then
    /// validate the result.
    fn apply_overrides(&self, mut config: ClientConfig) -> anyhow::Result<ClientConfig> {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if !self.roots.is_empty() {
            config = config.with_rest_roots(self.roots.iter().cloned());
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy);
        }
        if self.insecure {
            config = config.with_tls_verify(false);
        } else if self.verify_tls {
            config = config.with_tls_verify(true);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config.validated().context("invalid configuration")
    }

    fn search_request(&self) -> SearchRequest {
        SearchRequest::new(self.base_dn.clone())
            .with_filter(self.filter.clone())
            .with_attributes(self.attributes.iter().cloned())
            .with_scope(self.scope)
            .with_size_limit(self.size_limit)
            .with_time_limit(self.time_limit)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match run(&cli).await {
        Ok(QueryOutcome::Unreachable) => {
            eprintln!("Unable to reach the VDS REST gateway.");
            ExitCode::from(QueryOutcome::Unreachable.exit_code())
        }
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<QueryOutcome> {
    let config = ClientConfig::read_env().context("failed to read VDS_* configuration")?;
    let config = cli.apply_overrides(config)?;
    let client = DirectoryRestClient::new(config).context("failed to build VDS client")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_query(&client, &cli.search_request(), cli.max_output, &mut out)
        .await
        .context("failed to write search result")
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins over the verbosity flags
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn,vds_core=info,vds_rest=info".to_string(),
            1 => "info,vds_core=debug,vds_rest=debug".to_string(),
            _ => "debug,vds_core=trace,vds_rest=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 1)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}
