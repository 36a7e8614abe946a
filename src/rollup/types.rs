//! JSON bodies exchanged with the rollup server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verdict on the request just processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FinishStatus {
    /// Request handled; outputs are kept.
    Accept,
    /// Request refused; outputs are discarded.
    Reject,
}

/// Body of `POST /finish`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinishBody {
    /// Verdict on the previous request.
    pub status: FinishStatus,
}

/// Metadata attached to advance requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceMetadata {
    /// Account that submitted the input, as sent (unparsed).
    pub msg_sender: String,
    /// Epoch the input belongs to.
    #[serde(default)]
    pub epoch_index: Option<u64>,
    /// Index of the input.
    #[serde(default)]
    pub input_index: Option<u64>,
    /// L1 block of the input.
    #[serde(default)]
    pub block_number: Option<u64>,
    /// L1 timestamp of the input.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// `data` of an `advance_state` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// Sender and input position.
    pub metadata: AdvanceMetadata,
    /// Hex-encoded input.
    pub payload: String,
}

/// `data` of an `inspect_state` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectRequest {
    /// Hex-encoded query.
    pub payload: String,
}

/// A pending request handed out by `/finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollupRequest {
    /// State-changing input.
    Advance(AdvanceRequest),
    /// Read-only query.
    Inspect(InspectRequest),
}

/// Untyped body of a `200` response to `/finish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRequest {
    /// `advance_state` or `inspect_state`.
    pub request_type: String,
    /// Request body, shaped by `request_type`.
    pub data: Value,
}

/// A `/finish` response that does not become a [`RollupRequest`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RequestError {
    /// No handler exists for this request type.
    #[display("Unknown request type '{}'", _0)]
    UnknownType(String),

    /// Known request type whose `data` does not have the expected shape.
    #[display("Malformed {} request: {}", request_type, reason)]
    Malformed {
        /// The request type that was recognized.
        request_type: String,
        /// Deserialization failure.
        reason: String,
    },
}

impl std::error::Error for RequestError {}

impl TryFrom<RawRequest> for RollupRequest {
    type Error = RequestError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let malformed = |err: serde_json::Error| RequestError::Malformed {
            request_type: raw.request_type.clone(),
            reason: err.to_string(),
        };
        match raw.request_type.as_str() {
            "advance_state" => serde_json::from_value(raw.data)
                .map(RollupRequest::Advance)
                .map_err(malformed),
            "inspect_state" => serde_json::from_value(raw.data)
                .map(RollupRequest::Inspect)
                .map_err(malformed),
            other => Err(RequestError::UnknownType(other.to_string())),
        }
    }
}

/// Body of `POST /notice` and `POST /report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadBody {
    /// Hex-encoded bytes.
    pub payload: String,
}

/// Body of `POST /voucher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherBody {
    /// Contract the voucher calls.
    pub destination: String,
    /// Hex-encoded calldata.
    pub payload: String,
}
