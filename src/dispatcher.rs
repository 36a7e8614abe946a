//! Routes rollup requests to the game and wallet logic.
//!
//! The dispatcher owns all application state. Each request is handled to
//! completion, outputs included, and ends in exactly one [`FinishStatus`].
//! Advance failures of any kind become a diagnostic report plus `reject`;
//! inspect queries always produce a report.

use crate::Address;
use crate::games::tictactoe::{GameRegistry, MoveError, RoundOutcome};
use crate::payload::{AdvanceCommand, InspectQuery, PayloadError, decode_hex, to_text};
use crate::reports;
use crate::rollup::{AdvanceRequest, FinishStatus, InspectRequest, Rollup, RollupError, RollupRequest};
use crate::wallet::{Erc20Deposit, InsufficientBalance, Ledger};
use derive_getters::Getters;
use ethers::types::U256;
use tracing::{debug, error, info, instrument, warn};

/// Why an advance request was rejected.
#[derive(Debug, Clone, derive_more::Display)]
pub enum DispatchError {
    /// Input did not decode.
    #[display("{}", _0)]
    Payload(PayloadError),

    /// Move refused by the engine.
    #[display("{}", _0)]
    Move(MoveError),

    /// Withdrawal exceeds the balance.
    #[display("{}", _0)]
    Balance(InsufficientBalance),

    /// Portal reported a failed L1 transfer.
    #[display("Deposit of {} {} tokens from {} failed on L1", amount, token, depositor)]
    DepositFailed {
        /// Account that tried to deposit.
        depositor: Address,
        /// ERC20 contract.
        token: Address,
        /// Amount that was not transferred.
        amount: U256,
    },

    /// An output could not be delivered.
    #[display("{}", _0)]
    Rollup(RollupError),
}

impl std::error::Error for DispatchError {}

impl From<PayloadError> for DispatchError {
    fn from(err: PayloadError) -> Self {
        DispatchError::Payload(err)
    }
}

impl From<MoveError> for DispatchError {
    fn from(err: MoveError) -> Self {
        DispatchError::Move(err)
    }
}

impl From<InsufficientBalance> for DispatchError {
    fn from(err: InsufficientBalance) -> Self {
        DispatchError::Balance(err)
    }
}

impl From<RollupError> for DispatchError {
    fn from(err: RollupError) -> Self {
        DispatchError::Rollup(err)
    }
}

/// Handles advance and inspect requests against in-memory state.
#[derive(Debug, Clone, Getters)]
pub struct Dispatcher {
    /// Every game played so far.
    games: GameRegistry,
    /// ERC20 balances.
    ledger: Ledger,
    /// Address whose inputs are deposit notifications.
    erc20_portal: Address,
}

impl Dispatcher {
    /// Creates a dispatcher with empty state.
    #[instrument]
    pub fn new(erc20_portal: Address) -> Self {
        info!(%erc20_portal, "Creating dispatcher");
        Self {
            games: GameRegistry::new(),
            ledger: Ledger::new(),
            erc20_portal,
        }
    }

    /// Routes a request to its handler.
    pub async fn dispatch(&mut self, rollup: &dyn Rollup, request: &RollupRequest) -> FinishStatus {
        match request {
            RollupRequest::Advance(advance) => self.handle_advance(rollup, advance).await,
            RollupRequest::Inspect(inspect) => self.handle_inspect(rollup, inspect).await,
        }
    }

    /// Handles a state-changing request.
    ///
    /// Any failure is reported to the rollup server and rejects the request.
    #[instrument(skip_all, fields(sender = %request.metadata.msg_sender, input_index = ?request.metadata.input_index))]
    pub async fn handle_advance(&mut self, rollup: &dyn Rollup, request: &AdvanceRequest) -> FinishStatus {
        debug!(payload = %request.payload, "Handling advance request");
        match self.advance(rollup, request).await {
            Ok(()) => FinishStatus::Accept,
            Err(err) => {
                warn!(error = %err, "Rejecting advance request");
                if let Err(report_err) = rollup.report(err.to_string().as_bytes()).await {
                    error!(error = %report_err, "Failed to deliver diagnostic report");
                }
                FinishStatus::Reject
            }
        }
    }

    async fn advance(&mut self, rollup: &dyn Rollup, request: &AdvanceRequest) -> Result<(), DispatchError> {
        let sender: Address = request
            .metadata
            .msg_sender
            .parse()
            .map_err(PayloadError::from)?;
        let payload = decode_hex(&request.payload)?;

        match AdvanceCommand::parse(&sender, &self.erc20_portal, &payload)? {
            AdvanceCommand::Deposit(deposit) => self.deposit(deposit),
            AdvanceCommand::Withdraw { token, amount } => {
                self.withdraw(rollup, &sender, &token, amount).await
            }
            AdvanceCommand::Move { opponent, row, col } => {
                self.play(rollup, &sender, &opponent, row, col, &payload).await
            }
        }
    }

    #[instrument(skip(self))]
    fn deposit(&mut self, deposit: Erc20Deposit) -> Result<(), DispatchError> {
        if !deposit.success {
            return Err(DispatchError::DepositFailed {
                depositor: deposit.depositor,
                token: deposit.token,
                amount: deposit.amount,
            });
        }
        self.ledger
            .credit(&deposit.depositor, &deposit.token, deposit.amount);
        Ok(())
    }

    #[instrument(skip(self, rollup))]
    async fn withdraw(
        &mut self,
        rollup: &dyn Rollup,
        sender: &Address,
        token: &Address,
        amount: U256,
    ) -> Result<(), DispatchError> {
        let withdrawal = self.ledger.debit_and_issue_withdrawal(sender, token, amount)?;

        if let Err(err) = rollup
            .voucher(&withdrawal.token, &withdrawal.transfer_call())
            .await
        {
            warn!(error = %err, "Voucher not delivered, restoring balance");
            self.ledger.credit(sender, token, amount);
            return Err(err.into());
        }

        info!(%sender, %token, %amount, "Withdrawal voucher issued");
        Ok(())
    }

    #[instrument(skip(self, rollup, payload))]
    async fn play(
        &mut self,
        rollup: &dyn Rollup,
        sender: &Address,
        opponent: &Address,
        row: i64,
        col: i64,
        payload: &[u8],
    ) -> Result<(), DispatchError> {
        let previous = self.games.get(sender, opponent).cloned();
        let (key, outcome) = self.games.play(sender, opponent, row, col)?;

        match outcome {
            RoundOutcome::Won { winner, .. } => {
                if let Some(game) = self.games.get(sender, opponent) {
                    info!(
                        pair_key = %key,
                        %winner,
                        "Victory!! Player {} Wins!! That makes it {} x {}",
                        winner,
                        game.score_of(sender),
                        game.score_of(opponent)
                    );
                }
            }
            RoundOutcome::Tie { .. } => info!(pair_key = %key, "It's a Tie!! Both players keep their scores."),
            RoundOutcome::Continue { next, .. } => debug!(pair_key = %key, %next, "Move accepted"),
        }

        if let Err(err) = rollup.notice(payload).await {
            warn!(pair_key = %key, error = %err, "Notice not delivered, undoing move");
            self.games.restore(key, previous);
            return Err(err.into());
        }
        Ok(())
    }

    /// Handles a read-only request; always emits one report.
    ///
    /// Undecodable queries are answered with the error text and rejected.
    #[instrument(skip_all)]
    pub async fn handle_inspect(&self, rollup: &dyn Rollup, request: &InspectRequest) -> FinishStatus {
        debug!(payload = %request.payload, "Handling inspect request");
        let (status, text) = match self.inspect(request) {
            Ok(text) => (FinishStatus::Accept, text),
            Err(err) => {
                warn!(error = %err, "Malformed inspect request");
                (FinishStatus::Reject, err.to_string())
            }
        };

        match rollup.report(text.as_bytes()).await {
            Ok(()) => status,
            Err(err) => {
                error!(error = %err, "Failed to deliver inspect report");
                FinishStatus::Reject
            }
        }
    }

    fn inspect(&self, request: &InspectRequest) -> Result<String, PayloadError> {
        let bytes = decode_hex(&request.payload)?;
        let query = InspectQuery::parse(to_text(&bytes)?)?;
        debug!(?query, "Answering inspect query");

        let text = match query {
            InspectQuery::Status(a, b) => reports::status(self.games.get(&a, &b), &a, &b),
            InspectQuery::GameKeys(address) => reports::game_keys(&self.games.keys_for(&address)),
            InspectQuery::Balance(address) => reports::balance(self.ledger.balances(&address)),
            InspectQuery::Help => reports::HELP.to_string(),
        };
        Ok(text)
    }
}
