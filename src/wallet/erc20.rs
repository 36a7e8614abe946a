//! ERC20 wire formats: portal deposits in, transfer calls out.

use super::Withdrawal;
use crate::payload::PayloadError;
use crate::Address;
use ethers::abi::{self, Token};
use ethers::types::U256;
use tracing::{debug, instrument};

/// Selector of `transfer(address,uint256)`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Length of a packed `(bool, address, address, uint256)` tuple.
pub const DEPOSIT_PAYLOAD_LEN: usize = 1 + 20 + 20 + 32;

/// Deposit notification relayed by the ERC20 portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20Deposit {
    /// Whether the L1 `transferFrom` succeeded.
    pub success: bool,
    /// ERC20 contract.
    pub token: Address,
    /// Account that deposited.
    pub depositor: Address,
    /// Amount in base units.
    pub amount: U256,
}

impl Erc20Deposit {
    /// Decodes the packed portal payload.
    ///
    /// Bytes past the fixed tuple are extra data appended by the portal
    /// and are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the payload is too short or the success
    /// flag is not a boolean.
    #[instrument(skip(payload), fields(len = payload.len()))]
    pub fn decode_packed(payload: &[u8]) -> Result<Self, PayloadError> {
        if payload.len() < DEPOSIT_PAYLOAD_LEN {
            return Err(PayloadError::AbiLength {
                expected: DEPOSIT_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let success = match payload[0] {
            0 => false,
            1 => true,
            other => return Err(PayloadError::Flag(other)),
        };

        let deposit = Self {
            success,
            token: address_at(payload, 1),
            depositor: address_at(payload, 21),
            amount: U256::from_big_endian(&payload[41..DEPOSIT_PAYLOAD_LEN]),
        };

        if payload.len() > DEPOSIT_PAYLOAD_LEN {
            debug!(
                extra = payload.len() - DEPOSIT_PAYLOAD_LEN,
                "Ignoring trailing deposit data"
            );
        }
        Ok(deposit)
    }

    /// Packs the tuple the way the portal does.
    pub fn encode_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DEPOSIT_PAYLOAD_LEN);
        out.push(u8::from(self.success));
        out.extend_from_slice(self.token.as_bytes());
        out.extend_from_slice(self.depositor.as_bytes());
        let mut amount = [0u8; 32];
        self.amount.to_big_endian(&mut amount);
        out.extend_from_slice(&amount);
        out
    }
}

fn address_at(payload: &[u8], offset: usize) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&payload[offset..offset + 20]);
    Address::from_bytes(bytes)
}

impl Withdrawal {
    /// Calldata for `token.transfer(recipient, amount)`.
    pub fn transfer_call(&self) -> Vec<u8> {
        let args = abi::encode(&[
            Token::Address(self.recipient.to_h160()),
            Token::Uint(self.amount),
        ]);
        [TRANSFER_SELECTOR.as_slice(), args.as_slice()].concat()
    }
}
