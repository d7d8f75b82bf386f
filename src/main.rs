//! CLI entry point for gua: Microsoft 365 user, license, and group
//! administration over Microsoft Graph.
//!
//! Loads the config file, authenticates once via client credentials, then
//! runs the selected command. Everything runs on a single-threaded runtime
//! and every Graph call is awaited before the next one starts.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (config, authentication, Graph request)
//! - 2: argument validation error (clap handles this automatically)

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use graph_user_admin::auth::TokenProvider;
use graph_user_admin::cli::Cli;
use graph_user_admin::client::GraphClient;
use graph_user_admin::commands::{execute, Context};
use graph_user_admin::config::Config;
use graph_user_admin::error::Result;
use graph_user_admin::output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    // Status lines go to stderr so `--output json` stays machine-readable.
    let mut status = std::io::stderr();
    output::info(&mut status, "Authenticating with Microsoft Graph...")?;
    debug!(tenant_id = %config.tenant_id, client_id = %config.client_id, "credentials loaded");

    let provider = TokenProvider::new(&config.tenant_id, &config.client_id, &config.client_secret)?;
    let token = provider.acquire_token().await?;
    output::success(&mut status, "Authentication successful!")?;

    let client = GraphClient::new(token)?;
    let ctx = Context {
        client: &client,
        hints: &config.license_error_hints,
        format: cli.output,
    };

    let mut stdout = std::io::stdout().lock();
    execute(&ctx, cli.command, &mut stdout).await
}
