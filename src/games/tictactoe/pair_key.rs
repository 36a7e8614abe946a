//! Canonical identifiers for a pair of players.

use crate::Address;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Order-independent key for the game between two addresses.
///
/// Rendered as `"<lower>-<higher>"` where both halves are lowercase hex, so
/// `PairKey::new(a, b) == PairKey::new(b, a)` for every pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(String);

impl PairKey {
    /// Derives the key for two addresses in either order.
    #[instrument]
    pub fn new(a: &Address, b: &Address) -> Self {
        let (first, second) = Self::ordered(a, b);
        Self(format!("{first}-{second}"))
    }

    /// Returns the two addresses sorted the way the key orders them.
    pub fn ordered(a: &Address, b: &Address) -> (Address, Address) {
        if a <= b { (*a, *b) } else { (*b, *a) }
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    #[test]
    fn test_key_is_symmetric() {
        let a: Address = ALICE.parse().unwrap();
        let b: Address = BOB.parse().unwrap();
        assert_eq!(PairKey::new(&a, &b), PairKey::new(&b, &a));
    }

    #[test]
    fn test_key_orders_lowercase_text() {
        let a: Address = ALICE.parse().unwrap();
        let b: Address = BOB.parse().unwrap();
        assert_eq!(
            PairKey::new(&a, &b).as_str(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8-0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_key_ignores_input_case() {
        let upper: Address = ALICE.to_uppercase().replace("0X", "0x").parse().unwrap();
        let lower: Address = ALICE.to_lowercase().parse().unwrap();
        let b: Address = BOB.parse().unwrap();
        assert_eq!(PairKey::new(&upper, &b), PairKey::new(&b, &lower));
    }
}
