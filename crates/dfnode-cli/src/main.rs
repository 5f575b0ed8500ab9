//! CLI entry point.
//!
//! Parses arguments, wires the supervisor via [`bootstrap`], and routes
//! each command to its handler. Failures exit with the code mapped by
//! [`CliError::exit_code`].

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dfnode_core::NoopChannel;
use dfnode_runtime::EnvelopeBroadcaster;
use tracing_subscriber::EnvFilter;

use dfnode_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before settings read DFNODE_* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = CliConfig::from_cli(&cli)?;

    match cli.command {
        Commands::Paths => handlers::paths::execute(&config),
        Commands::RpcMethods { json } => handlers::rpc_methods::execute(json),
        Commands::Start { params } => {
            let broadcaster = Arc::new(EnvelopeBroadcaster::new());
            let ctx = bootstrap(config, broadcaster.clone());
            handlers::start::execute(&ctx, &broadcaster, &params).await
        }
        Commands::Stop => {
            let ctx = bootstrap(config, Arc::new(NoopChannel::new()));
            handlers::stop::execute(&ctx).await
        }
        Commands::Status => {
            let ctx = bootstrap(config, Arc::new(NoopChannel::new()));
            handlers::status::execute(&ctx).await
        }
    }
}
