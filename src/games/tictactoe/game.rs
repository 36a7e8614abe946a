//! Per-pair game record and the engine operations that mutate it.
//!
//! A [`GameState`] lives for the whole process. Rounds come and go inside
//! it: when a round ends the board is cleared in the same call that books
//! the result, so a state is never observed with a finished board.
//!
//! `current_turn == None` means nobody holds the turn yet, either because
//! the pair has just been created or because the last round concluded.
//! In that state either participant may open the round.

use super::action::{MoveError, Placement, RoundOutcome};
use super::rules::evaluate;
use super::{Board, Mark, Outcome, PairKey, Position, Square};
use crate::Address;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Mutable record of the games played between two addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameState {
    /// Canonical key for the pair.
    key: PairKey,
    /// Both participants, in key order.
    players: (Address, Address),
    /// Board of the round in progress.
    board: Board,
    /// Accepted moves in the current round.
    turn_count: u8,
    /// Player allowed to move next, if any.
    current_turn: Option<Address>,
    /// Rounds won per participant.
    score: BTreeMap<Address, u32>,
    /// Completed rounds.
    games_count: u32,
}

impl GameState {
    /// Creates a fresh record for two players with zeroed scores.
    #[instrument]
    pub fn new(a: Address, b: Address) -> Self {
        let key = PairKey::new(&a, &b);
        let players = PairKey::ordered(&a, &b);
        let score = BTreeMap::from([(players.0, 0), (players.1, 0)]);
        debug!(pair_key = %key, "Creating game state");
        Self {
            key,
            players,
            board: Board::new(),
            turn_count: 0,
            current_turn: None,
            score,
            games_count: 0,
        }
    }

    /// Checks whether `address` is one of the pair.
    pub fn is_participant(&self, address: &Address) -> bool {
        self.players.0 == *address || self.players.1 == *address
    }

    /// Returns the other participant.
    pub fn opponent_of(&self, address: &Address) -> Option<Address> {
        if self.players.0 == *address {
            Some(self.players.1)
        } else if self.players.1 == *address {
            Some(self.players.0)
        } else {
            None
        }
    }

    /// Rounds won by `address` (0 for strangers).
    pub fn score_of(&self, address: &Address) -> u32 {
        self.score.get(address).copied().unwrap_or(0)
    }

    /// Validates and places a mark for `mover` at `(row, col)`.
    ///
    /// The mark is chosen by `turn_count` parity. Turn handoff and round
    /// completion are left to [`GameState::play`]; a rejected move leaves
    /// the state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if `mover` is not in the game, does not hold
    /// the turn, or targets an off-board or occupied square.
    #[instrument(skip(self), fields(pair_key = %self.key, turn_count = self.turn_count))]
    pub fn apply_move(&mut self, mover: &Address, row: i64, col: i64) -> Result<Placement, MoveError> {
        if !self.is_participant(mover) {
            warn!(%mover, "Move from outside the pair");
            return Err(MoveError::NotAParticipant(*mover));
        }

        if let Some(expected) = self.current_turn
            && expected != *mover
        {
            warn!(%mover, %expected, "Player tried to move out of turn");
            return Err(MoveError::NotYourTurn { expected });
        }

        let position = Position::from_row_col(row, col).ok_or_else(|| {
            warn!(row, col, "Move off the board");
            MoveError::OutOfBounds { row, col }
        })?;

        if !self.board.is_empty(position) {
            warn!(%position, "Square already occupied");
            return Err(MoveError::SlotTaken(position));
        }

        let mark = Mark::for_turn(self.turn_count);
        self.board.set(position, Square::Occupied(mark));
        self.turn_count += 1;
        debug_assert_eq!(self.board.occupied(), usize::from(self.turn_count));

        debug!(%position, %mark, turn_count = self.turn_count, "Mark placed");
        Ok(Placement {
            mover: *mover,
            position,
            mark,
            turn_count: self.turn_count,
        })
    }

    /// Books a concluded round and clears the board.
    ///
    /// Increments `games_count`, credits `winner` (if any) with one win,
    /// and resets the board, turn count and turn holder.
    #[instrument(skip(self), fields(pair_key = %self.key))]
    pub fn finish_round(&mut self, winner: Option<&Address>) {
        self.games_count += 1;

        if let Some(winner) = winner {
            match self.score.get_mut(winner) {
                Some(wins) => *wins += 1,
                None => warn!(%winner, "Winner is not a participant, score unchanged"),
            }
        }

        self.board = Board::new();
        self.turn_count = 0;
        self.current_turn = None;

        info!(games_count = self.games_count, "Round finished");
    }

    /// Plays one move: apply, evaluate, then finish the round or pass the turn.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the move is rejected; state is unchanged.
    #[instrument(skip(self), fields(pair_key = %self.key))]
    pub fn play(&mut self, mover: &Address, row: i64, col: i64) -> Result<RoundOutcome, MoveError> {
        let placement = self.apply_move(mover, row, col)?;

        let outcome = match evaluate(&self.board) {
            Outcome::Win(mark) => {
                debug_assert_eq!(mark, placement.mark);
                self.finish_round(Some(mover));
                info!(
                    winner = %mover,
                    wins = self.score_of(mover),
                    "Victory"
                );
                RoundOutcome::Won {
                    placement,
                    winner: *mover,
                }
            }
            Outcome::Tie => {
                self.finish_round(None);
                info!("Tie, both players keep their scores");
                RoundOutcome::Tie { placement }
            }
            Outcome::InProgress => {
                let next = self
                    .opponent_of(mover)
                    .ok_or(MoveError::NotAParticipant(*mover))?;
                self.current_turn = Some(next);
                debug!(%next, "Turn handed over");
                RoundOutcome::Continue { placement, next }
            }
        };

        Ok(outcome)
    }
}
