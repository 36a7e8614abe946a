//! Tic-tac-toe between pairs of addresses.

mod action;
mod game;
mod pair_key;
mod position;
mod registry;
mod rules;
mod types;

pub use action::{MoveError, Placement, RoundOutcome};
pub use game::GameState;
pub use pair_key::PairKey;
pub use position::Position;
pub use registry::GameRegistry;
pub use rules::{check_winner, evaluate, is_full};
pub use types::{Board, Mark, Outcome, Square};
