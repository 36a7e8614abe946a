//! Command-line interface for strictly_rollup.

use clap::Parser;
use strictly_rollup::Address;

/// Strictly Rollup - tic-tac-toe and ERC20 ledger rollup backend
#[derive(Parser, Debug)]
#[command(name = "strictly_rollup")]
#[command(about = "Tic-tac-toe and ERC20 ledger backend for a rollup server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the rollup HTTP server
    #[arg(long, env = "ROLLUP_HTTP_SERVER_URL")]
    pub rollup_url: Option<String>,

    /// Address of the ERC20 portal that relays deposits
    #[arg(long, env = "ERC20_PORTAL_ADDRESS")]
    pub erc20_portal: Option<Address>,

    /// Milliseconds to wait before polling again after a transport failure
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Path to a TOML configuration file (optional)
    #[arg(short, long, default_value = "strictly_rollup.toml")]
    pub config: std::path::PathBuf,
}
