//! Boundary with the rollup server.
//!
//! The backend pulls work from `/finish` and pushes outputs to `/notice`,
//! `/report` and `/voucher`. Output calls go through the [`Rollup`] trait so
//! request handling can be exercised without a server.

mod client;
mod error;
mod types;

pub use client::RollupClient;
pub use error::RollupError;
pub use types::{
    AdvanceMetadata, AdvanceRequest, FinishBody, FinishStatus, InspectRequest, PayloadBody,
    RawRequest, RequestError, RollupRequest, VoucherBody,
};

use crate::Address;

/// Outputs a request handler can emit.
#[async_trait::async_trait]
pub trait Rollup: Send + Sync {
    /// Emits a notice (state commitment) with raw bytes.
    async fn notice(&self, payload: &[u8]) -> Result<(), RollupError>;

    /// Emits a report (diagnostic or query answer) with raw bytes.
    async fn report(&self, payload: &[u8]) -> Result<(), RollupError>;

    /// Emits a voucher calling `destination` with `payload` as calldata.
    async fn voucher(&self, destination: &Address, payload: &[u8]) -> Result<(), RollupError>;
}
