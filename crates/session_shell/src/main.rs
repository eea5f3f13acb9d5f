use std::io;
use std::time::Duration;

use anyhow::Context;
use auth_session::SessionStore;
use clap::Parser;
use remote_authority_http::{AuthorityConfig, HttpAuthorityClient};
use session_shell::run_shell;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Interactive client for the authority's session endpoints.
///
/// Settings default to the `AUTH_SESSION_*` environment variables; flags
/// override them.
#[derive(Debug, Parser)]
#[command(name = "session_shell", version)]
struct Args {
    /// Base URL the `auth/*` endpoints are resolved against.
    #[arg(long)]
    base_url: Option<String>,

    /// Whole-request timeout in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AuthorityConfig::from_env().context("reading authority configuration")?;
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }

    let client = HttpAuthorityClient::new(config).context("building authority client")?;
    info!(
        base_url = %client.config().base_url,
        login = %client.endpoints().login,
        "session shell starting"
    );

    let store = SessionStore::new(client);
    let mut stdout = tokio::io::stdout();
    run_shell(&store, BufReader::new(tokio::io::stdin()), &mut stdout)
        .await
        .context("shell I/O failed")?;

    Ok(())
}
