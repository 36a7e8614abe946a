//! Store of every game played since the process started.

use super::action::{MoveError, RoundOutcome};
use super::{GameState, PairKey};
use crate::Address;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// All game records, keyed by [`PairKey`].
///
/// Owned by the dispatcher; records are created on the first move between
/// a new pair and never removed.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    games: BTreeMap<PairKey, GameState>,
}

impl GameRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game registry");
        Self::default()
    }

    /// Looks up the game between two addresses.
    #[instrument(skip(self))]
    pub fn get(&self, a: &Address, b: &Address) -> Option<&GameState> {
        let key = PairKey::new(a, b);
        let game = self.games.get(&key);
        if game.is_none() {
            debug!(pair_key = %key, "Game not found");
        }
        game
    }

    /// Plays a move from `mover` against `opponent`.
    ///
    /// The game record is created lazily, and only kept if the opening move
    /// is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::SelfPlay`] if the two addresses match, or the
    /// engine's rejection otherwise.
    #[instrument(skip(self))]
    pub fn play(
        &mut self,
        mover: &Address,
        opponent: &Address,
        row: i64,
        col: i64,
    ) -> Result<(PairKey, RoundOutcome), MoveError> {
        if mover == opponent {
            return Err(MoveError::SelfPlay);
        }

        let key = PairKey::new(mover, opponent);
        let outcome = match self.games.get_mut(&key) {
            Some(game) => game.play(mover, row, col)?,
            None => {
                let mut game = GameState::new(*mover, *opponent);
                let outcome = game.play(mover, row, col)?;
                info!(pair_key = %key, "Created new game");
                self.games.insert(key.clone(), game);
                outcome
            }
        };

        Ok((key, outcome))
    }

    /// Puts back a record captured before a move, or forgets the pair if
    /// there was none.
    #[instrument(skip(self, previous), fields(pair_key = %key, existed = previous.is_some()))]
    pub fn restore(&mut self, key: PairKey, previous: Option<GameState>) {
        match previous {
            Some(game) => {
                self.games.insert(key, game);
            }
            None => {
                self.games.remove(&key);
            }
        }
        debug!("Game record restored");
    }

    /// Keys of every game `address` takes part in.
    #[instrument(skip(self))]
    pub fn keys_for(&self, address: &Address) -> Vec<PairKey> {
        let keys: Vec<_> = self
            .games
            .values()
            .filter(|game| game.is_participant(address))
            .map(|game| game.key().clone())
            .collect();
        debug!(count = keys.len(), "Listed game keys");
        keys
    }

    /// Number of games tracked.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// True if no game has been created.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    fn bob() -> Address {
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap()
    }

    #[test]
    fn test_rejected_opening_move_creates_nothing() {
        let mut registry = GameRegistry::new();
        assert!(registry.play(&alice(), &bob(), 5, 5).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_restore_undoes_moves() {
        let mut registry = GameRegistry::new();
        registry.play(&alice(), &bob(), 0, 0).unwrap();
        let before = registry.get(&alice(), &bob()).cloned();

        let (key, _) = registry.play(&bob(), &alice(), 1, 1).unwrap();
        registry.restore(key, before.clone());
        assert_eq!(registry.get(&alice(), &bob()).cloned(), before);

        let carol = Address::from_bytes([7; 20]);
        let (key, _) = registry.play(&carol, &alice(), 2, 2).unwrap();
        registry.restore(key, None);
        assert!(registry.get(&carol, &alice()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_self_play_rejected() {
        let mut registry = GameRegistry::new();
        assert_eq!(
            registry.play(&alice(), &alice(), 0, 0).unwrap_err(),
            MoveError::SelfPlay
        );
    }

    #[test]
    fn test_either_order_reaches_same_game() {
        let mut registry = GameRegistry::new();
        registry.play(&alice(), &bob(), 0, 0).unwrap();
        registry.play(&bob(), &alice(), 1, 1).unwrap();

        assert_eq!(registry.len(), 1);
        let game = registry.get(&bob(), &alice()).unwrap();
        assert_eq!(*game.turn_count(), 2);
    }

    #[test]
    fn test_keys_for_lists_participation() {
        let carol: Address = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc".parse().unwrap();
        let mut registry = GameRegistry::new();
        registry.play(&alice(), &bob(), 0, 0).unwrap();
        registry.play(&carol, &bob(), 0, 0).unwrap();

        assert_eq!(registry.keys_for(&bob()).len(), 2);
        assert_eq!(registry.keys_for(&alice()), vec![PairKey::new(&alice(), &bob())]);
        assert!(registry.keys_for(&"0x0000000000000000000000000000000000000001".parse().unwrap()).is_empty());
    }
}
