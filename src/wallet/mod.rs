//! ERC20 deposits, balances and withdrawals.

mod erc20;
mod ledger;

pub use erc20::{DEPOSIT_PAYLOAD_LEN, Erc20Deposit, TRANSFER_SELECTOR};
pub use ledger::{InsufficientBalance, Ledger, Withdrawal};
