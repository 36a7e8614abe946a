//! Strictly Rollup - backend entry point
//!
//! Polls the rollup server until interrupted.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use strictly_rollup::{Dispatcher, RollupClient, RollupConfig, Runner};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file before clap reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = RollupConfig::load(&cli.config)?.with_overrides(
        cli.rollup_url,
        cli.erc20_portal,
        cli.retry_delay_ms,
    );

    let client = RollupClient::new(config.rollup_url()?.to_string());
    let dispatcher = Dispatcher::new(*config.erc20_portal());
    let runner = Runner::new(client, dispatcher, config.retry_delay());

    let dispatcher = runner
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!(games = dispatcher.games().len(), "Shutting down");
    Ok(())
}

#[instrument]
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,strictly_rollup=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Tracing initialized");
}
