//! Typed parsing of rollup input payloads.
//!
//! Payloads reach the backend as `0x`-hex strings. Each one is decoded
//! exactly once into an [`AdvanceCommand`] or [`InspectQuery`]; anything
//! that does not fit one of the known shapes becomes a [`PayloadError`].

use crate::address::AddressError;
use crate::wallet::Erc20Deposit;
use crate::Address;
use ethers::types::U256;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Input that does not decode into a known command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PayloadError {
    /// Payload text is not hex.
    #[display("Payload is not valid hex: {}", _0)]
    Hex(String),

    /// Decoded bytes are not UTF-8.
    #[display("Payload is not UTF-8 text")]
    Utf8,

    /// JSON object that is not a known action.
    #[display("Malformed JSON payload: {}", _0)]
    Json(String),

    /// Wrong number of comma-separated fields.
    #[display("Expected {} comma-separated fields, got {}", expected, actual)]
    FieldCount {
        /// Fields the command takes.
        expected: usize,
        /// Fields received.
        actual: usize,
    },

    /// A numeric field failed to parse.
    #[display("Invalid number '{}'", _0)]
    Number(String),

    /// An address field failed to parse.
    #[display("{}", _0)]
    Address(AddressError),

    /// Packed ABI payload too short.
    #[display("Deposit payload is {} bytes, expected at least {}", actual, expected)]
    AbiLength {
        /// Minimum length.
        expected: usize,
        /// Received length.
        actual: usize,
    },

    /// Packed bool that is neither 0 nor 1.
    #[display("Deposit success flag must be 0 or 1, got {}", _0)]
    Flag(u8),
}

impl std::error::Error for PayloadError {}

impl From<AddressError> for PayloadError {
    fn from(err: AddressError) -> Self {
        PayloadError::Address(err)
    }
}

/// Decodes `0x`-prefixed (or bare) hex into bytes.
///
/// # Errors
///
/// Returns [`PayloadError::Hex`] for odd lengths or non-hex digits.
#[instrument]
pub fn decode_hex(payload: &str) -> Result<Vec<u8>, PayloadError> {
    let digits = payload.strip_prefix("0x").unwrap_or(payload);
    hex::decode(digits).map_err(|e| PayloadError::Hex(e.to_string()))
}

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes bytes as UTF-8 text.
///
/// # Errors
///
/// Returns [`PayloadError::Utf8`] if the bytes are not valid UTF-8.
pub fn to_text(bytes: &[u8]) -> Result<&str, PayloadError> {
    std::str::from_utf8(bytes).map_err(|_| PayloadError::Utf8)
}

/// A state-changing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceCommand {
    /// Portal notification that tokens were deposited.
    Deposit(Erc20Deposit),

    /// Request to move deposited tokens back to L1.
    Withdraw {
        /// ERC20 contract.
        token: Address,
        /// Amount in base units.
        amount: U256,
    },

    /// Tic-tac-toe move against `opponent`.
    Move {
        /// The other player.
        opponent: Address,
        /// Target row (bounds are checked by the engine).
        row: i64,
        /// Target column (bounds are checked by the engine).
        col: i64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum JsonAction {
    Withdraw { erc20: Address, amount: JsonAmount },
}

/// Amounts may be JSON numbers or decimal strings for values past `u64`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonAmount {
    Number(u64),
    Text(String),
}

impl JsonAmount {
    fn to_u256(&self) -> Result<U256, PayloadError> {
        match self {
            JsonAmount::Number(n) => Ok(U256::from(*n)),
            JsonAmount::Text(s) => {
                U256::from_dec_str(s.trim()).map_err(|_| PayloadError::Number(s.clone()))
            }
        }
    }
}

impl AdvanceCommand {
    /// Parses an advance payload.
    ///
    /// Inputs sent by `portal` are packed deposit notifications. Other
    /// senders submit either a JSON action object or a
    /// `"<opponent>,<row>,<col>"` move.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the payload matches no known shape.
    #[instrument(skip(payload), fields(len = payload.len()))]
    pub fn parse(sender: &Address, portal: &Address, payload: &[u8]) -> Result<Self, PayloadError> {
        if sender == portal {
            debug!("Input from ERC20 portal, decoding deposit");
            return Erc20Deposit::decode_packed(payload).map(AdvanceCommand::Deposit);
        }

        let text = to_text(payload)?.trim();
        if text.starts_with('{') {
            let action: JsonAction =
                serde_json::from_str(text).map_err(|e| PayloadError::Json(e.to_string()))?;
            return match action {
                JsonAction::Withdraw { erc20, amount } => Ok(AdvanceCommand::Withdraw {
                    token: erc20,
                    amount: amount.to_u256()?,
                }),
            };
        }

        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        let [opponent, row, col] = fields.as_slice() else {
            return Err(PayloadError::FieldCount {
                expected: 3,
                actual: fields.len(),
            });
        };

        Ok(AdvanceCommand::Move {
            opponent: opponent.parse()?,
            row: parse_coordinate(row)?,
            col: parse_coordinate(col)?,
        })
    }
}

fn parse_coordinate(field: &str) -> Result<i64, PayloadError> {
    field
        .parse()
        .map_err(|_| PayloadError::Number(field.to_string()))
}

/// Inspect query verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
enum InspectVerb {
    #[strum(serialize = "status")]
    Status,
    #[strum(serialize = "game-key")]
    GameKey,
    #[strum(serialize = "balance")]
    Balance,
}

/// A read-only request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectQuery {
    /// Board and score of the game between two addresses.
    Status(Address, Address),
    /// Keys of every game an address plays in.
    GameKeys(Address),
    /// Token balances of an address.
    Balance(Address),
    /// Unrecognized command; answered with usage text.
    Help,
}

impl InspectQuery {
    /// Parses `"<verb>,<args…>"` inspect text.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when a known verb has the wrong arguments.
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, PayloadError> {
        let fields: Vec<&str> = text.trim().split(',').map(str::trim).collect();
        let Some(verb) = fields.first().and_then(|v| v.parse::<InspectVerb>().ok()) else {
            debug!("Unrecognized inspect command");
            return Ok(InspectQuery::Help);
        };

        let expected = match verb {
            InspectVerb::Status => 3,
            InspectVerb::GameKey | InspectVerb::Balance => 2,
        };
        if fields.len() != expected {
            return Err(PayloadError::FieldCount {
                expected,
                actual: fields.len(),
            });
        }

        let query = match verb {
            InspectVerb::Status => InspectQuery::Status(fields[1].parse()?, fields[2].parse()?),
            InspectVerb::GameKey => InspectQuery::GameKeys(fields[1].parse()?),
            InspectVerb::Balance => InspectQuery::Balance(fields[1].parse()?),
        };
        debug!(%verb, "Parsed inspect query");
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const BOB: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
    const PORTAL: &str = "0x9c21aeb2093c32ddbc53eef24b873bdcd1ada1db";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_hex_helpers() {
        assert_eq!(encode_hex(b"hi"), "0x6869");
        assert_eq!(decode_hex("0x6869").unwrap(), b"hi");
        assert!(matches!(decode_hex("0x686"), Err(PayloadError::Hex(_))));
    }

    #[test]
    fn test_parse_move() {
        let payload = format!("{BOB},0,2");
        let cmd = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap();
        assert_eq!(
            cmd,
            AdvanceCommand::Move {
                opponent: addr(BOB),
                row: 0,
                col: 2
            }
        );
    }

    #[test]
    fn test_parse_move_keeps_negative_coordinates_for_engine() {
        let payload = format!("{BOB},-1,0");
        let cmd = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap();
        assert!(matches!(cmd, AdvanceCommand::Move { row: -1, .. }));
    }

    #[test]
    fn test_parse_move_wrong_field_count() {
        let payload = format!("{BOB},0");
        let err = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap_err();
        assert_eq!(err, PayloadError::FieldCount { expected: 3, actual: 2 });
    }

    #[test]
    fn test_parse_move_bad_number() {
        let payload = format!("{BOB},a,0");
        let err = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap_err();
        assert_eq!(err, PayloadError::Number("a".to_string()));
    }

    #[test]
    fn test_parse_withdraw() {
        let payload = format!(r#"{{"action":"withdraw","erc20":"{PORTAL}","amount":10}}"#);
        let cmd = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap();
        assert_eq!(
            cmd,
            AdvanceCommand::Withdraw {
                token: addr(PORTAL),
                amount: U256::from(10)
            }
        );
    }

    #[test]
    fn test_parse_withdraw_large_amount_as_text() {
        let payload = format!(
            r#"{{"action":"withdraw","erc20":"{BOB}","amount":"100000000000000000000000"}}"#
        );
        let cmd = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload.as_bytes()).unwrap();
        let AdvanceCommand::Withdraw { amount, .. } = cmd else {
            panic!("expected withdrawal");
        };
        assert_eq!(amount, U256::from_dec_str("100000000000000000000000").unwrap());
    }

    #[test]
    fn test_parse_unknown_json_action() {
        let payload = br#"{"action":"burn","erc20":"0x00","amount":1}"#;
        let err = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), payload).unwrap_err();
        assert!(matches!(err, PayloadError::Json(_)));
    }

    #[test]
    fn test_parse_rejects_binary_from_player() {
        let err = AdvanceCommand::parse(&addr(ALICE), &addr(PORTAL), &[0xff, 0xfe]).unwrap_err();
        assert_eq!(err, PayloadError::Utf8);
    }

    #[test]
    fn test_parse_inspect_queries() {
        assert_eq!(
            InspectQuery::parse(&format!("status,{ALICE},{BOB}")).unwrap(),
            InspectQuery::Status(addr(ALICE), addr(BOB))
        );
        assert_eq!(
            InspectQuery::parse(&format!("game-key,{ALICE}")).unwrap(),
            InspectQuery::GameKeys(addr(ALICE))
        );
        assert_eq!(
            InspectQuery::parse(&format!("Balance, {BOB}")).unwrap(),
            InspectQuery::Balance(addr(BOB))
        );
    }

    #[test]
    fn test_parse_inspect_unknown_is_help() {
        assert_eq!(
            InspectQuery::parse("hello").unwrap(),
            InspectQuery::Help
        );
    }

    #[test]
    fn test_parse_inspect_missing_argument() {
        assert_eq!(
            InspectQuery::parse("status,0x00").unwrap_err(),
            PayloadError::FieldCount { expected: 3, actual: 2 }
        );
    }
}
