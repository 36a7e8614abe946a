//! Move results and rejections.
//!
//! Accepted moves and their consequences are domain events, returned to the
//! caller rather than logged and forgotten, so the dispatcher can decide
//! which outputs to emit.

use super::{Mark, Position};
use crate::Address;
use serde::{Deserialize, Serialize};

/// A mark that was placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Who moved.
    pub mover: Address,
    /// Where the mark went.
    pub position: Position,
    /// Which mark was placed.
    pub mark: Mark,
    /// Turn count after the move.
    pub turn_count: u8,
}

/// What an accepted move did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Round continues; `next` moves next.
    Continue {
        /// The mark placed.
        placement: Placement,
        /// Player to move next.
        next: Address,
    },
    /// The mover completed a line and won the round.
    Won {
        /// The winning placement.
        placement: Placement,
        /// The winner.
        winner: Address,
    },
    /// The board filled up without a winner.
    Tie {
        /// The final placement.
        placement: Placement,
    },
}

impl RoundOutcome {
    /// The placement that produced this outcome.
    pub fn placement(&self) -> &Placement {
        match self {
            RoundOutcome::Continue { placement, .. }
            | RoundOutcome::Won { placement, .. }
            | RoundOutcome::Tie { placement } => placement,
        }
    }

    /// True if this move ended the round.
    pub fn is_round_over(&self) -> bool {
        !matches!(self, RoundOutcome::Continue { .. })
    }
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Another participant holds the turn.
    #[display("Not your turn: waiting for {}", expected)]
    NotYourTurn {
        /// Who may move.
        expected: Address,
    },

    /// The mover does not belong to this game.
    #[display("{} is not a player in this game", _0)]
    NotAParticipant(Address),

    /// Row or column outside `0..=2`.
    #[display("Position ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The target square already holds a mark.
    #[display("Slot {} is already taken", _0)]
    SlotTaken(Position),

    /// A player named themselves as the opponent.
    #[display("Cannot play against yourself")]
    SelfPlay,
}

impl std::error::Error for MoveError {}
