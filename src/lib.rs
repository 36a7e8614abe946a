//! Strictly Rollup - tic-tac-toe and an ERC20 ledger for a rollup backend
//!
//! The backend polls a rollup HTTP server for inputs and answers them from
//! in-memory state.
//!
//! # Architecture
//!
//! - **Games**: tic-tac-toe state machine keyed by an order-independent pair key
//! - **Wallet**: ERC20 balances, portal deposits and transfer vouchers
//! - **Payload**: typed parsing of advance and inspect inputs
//! - **Dispatcher**: routes requests and emits notices, reports and vouchers
//! - **Runner**: the sequential `/finish` poll loop
//!
//! # Example
//!
//! ```no_run
//! use strictly_rollup::{Dispatcher, RollupClient, RollupConfig, Runner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RollupConfig::default()
//!     .with_overrides(Some("http://127.0.0.1:5004".to_string()), None, None);
//! let client = RollupClient::new(config.rollup_url()?.to_string());
//! let dispatcher = Dispatcher::new(*config.erc20_portal());
//! let runner = Runner::new(client, dispatcher, config.retry_delay());
//! runner.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod address;
mod config;
mod dispatcher;
mod games;
mod payload;
mod reports;
mod rollup;
mod runner;
mod wallet;

// Crate-level exports - Addresses
pub use address::{Address, AddressError};

// Crate-level exports - Configuration
pub use config::{ConfigError, DEFAULT_ERC20_PORTAL, RollupConfig};

// Crate-level exports - Request handling
pub use dispatcher::{DispatchError, Dispatcher};
pub use runner::Runner;

// Crate-level exports - Payload parsing
pub use payload::{AdvanceCommand, InspectQuery, PayloadError, decode_hex, encode_hex};

// Crate-level exports - Rollup server boundary
pub use rollup::{
    AdvanceMetadata, AdvanceRequest, FinishBody, FinishStatus, InspectRequest, PayloadBody,
    RawRequest, RequestError, Rollup, RollupClient, RollupError, RollupRequest, VoucherBody,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, GameRegistry, GameState, Mark, MoveError, Outcome, PairKey, Placement, Position,
    RoundOutcome, Square, check_winner, evaluate, is_full,
};

// Crate-level exports - Wallet
pub use wallet::{
    DEPOSIT_PAYLOAD_LEN, Erc20Deposit, InsufficientBalance, Ledger, TRANSFER_SELECTOR, Withdrawal,
};

/// Re-exported so callers can name ledger amounts without depending on ethers.
pub use ethers::types::U256;
