//! Account addresses as they appear in rollup inputs.
//!
//! Addresses arrive as `0x`-prefixed hex text in arbitrary case. They are
//! parsed once at the boundary and always rendered lowercase, so every
//! comparison and map lookup downstream is case-insensitive for free.

use derive_more::{Display, Error};
use ethers::types::H160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tracing::instrument;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(H160);

impl Address {
    /// Wraps raw address bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_fixed_bytes()
    }

    /// Returns the underlying ABI address type.
    pub fn to_h160(self) -> H160 {
        self.0
    }
}

impl From<H160> for Address {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| AddressError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::from_bytes(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Text that is not a 20-byte hex address.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid address '{}': {}", input, reason)]
pub struct AddressError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}
