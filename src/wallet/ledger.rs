//! ERC20 balances held on behalf of depositors.

use crate::Address;
use derive_more::{Display, Error};
use derive_new::new;
use ethers::types::U256;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// An approved withdrawal, ready to become a transfer voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Withdrawal {
    /// ERC20 contract to call.
    pub token: Address,
    /// Account receiving the tokens.
    pub recipient: Address,
    /// Amount in the token's base units.
    pub amount: U256,
}

/// Withdrawal larger than the stored balance.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display(
    "User {} does not have enough {} tokens: balance {}, requested {}",
    depositor,
    token,
    balance,
    requested
)]
pub struct InsufficientBalance {
    /// Account that asked to withdraw.
    pub depositor: Address,
    /// Token requested.
    pub token: Address,
    /// Balance at the time of the request.
    pub balance: U256,
    /// Amount requested.
    pub requested: U256,
}

/// Depositor → token → amount.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: BTreeMap<Address, BTreeMap<Address, U256>>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the depositor's balance of `token`.
    ///
    /// Returns the new balance. Addition saturates at `U256::MAX`.
    #[instrument(skip(self))]
    pub fn credit(&mut self, depositor: &Address, token: &Address, amount: U256) -> U256 {
        let balance = self
            .balances
            .entry(*depositor)
            .or_default()
            .entry(*token)
            .or_default();
        *balance = balance.saturating_add(amount);
        info!(%depositor, %token, %amount, balance = %*balance, "Balance credited");
        *balance
    }

    /// Debits `amount` and returns the withdrawal to hand to the voucher issuer.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientBalance`] when the balance is below `amount`;
    /// the ledger is left unchanged.
    #[instrument(skip(self))]
    pub fn debit_and_issue_withdrawal(
        &mut self,
        depositor: &Address,
        token: &Address,
        amount: U256,
    ) -> Result<Withdrawal, InsufficientBalance> {
        let balance = self.balance_of(depositor, token);
        if balance < amount {
            warn!(%depositor, %token, %balance, %amount, "Insufficient balance");
            return Err(InsufficientBalance {
                depositor: *depositor,
                token: *token,
                balance,
                requested: amount,
            });
        }

        let remaining = balance - amount;
        self.balances
            .entry(*depositor)
            .or_default()
            .insert(*token, remaining);
        info!(%depositor, %token, %amount, balance = %remaining, "Balance debited");

        Ok(Withdrawal::new(*token, *depositor, amount))
    }

    /// Current balance, zero if the depositor never held the token.
    pub fn balance_of(&self, depositor: &Address, token: &Address) -> U256 {
        self.balances
            .get(depositor)
            .and_then(|tokens| tokens.get(token))
            .copied()
            .unwrap_or_default()
    }

    /// All token balances of a depositor.
    #[instrument(skip(self))]
    pub fn balances(&self, depositor: &Address) -> Option<&BTreeMap<Address, U256>> {
        let tokens = self.balances.get(depositor);
        debug!(found = tokens.is_some(), "Looked up balances");
        tokens
    }
}
