//! HTTP client for the rollup server.

use super::types::{FinishBody, PayloadBody, RawRequest, VoucherBody};
use super::{FinishStatus, Rollup, RollupError};
use crate::Address;
use crate::payload::encode_hex;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Talks to the rollup server over HTTP.
#[derive(Debug, Clone)]
pub struct RollupClient {
    base_url: String,
    client: reqwest::Client,
}

impl RollupClient {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(%base_url, "HTTP rollup server url");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reports the verdict on the previous request and asks for the next one.
    ///
    /// Returns `None` when the server answers `202 Accepted` (nothing
    /// pending). The request type is left for the caller to interpret.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError`] on transport failure, unexpected status, or
    /// an unreadable body.
    #[instrument(skip(self))]
    pub async fn finish(&self, status: FinishStatus) -> Result<Option<RawRequest>, RollupError> {
        debug!("Sending finish");
        let response = self
            .client
            .post(format!("{}/finish", self.base_url))
            .json(&FinishBody { status })
            .send()
            .await?;

        let code = response.status();
        debug!(%code, "Received finish status");

        if code == StatusCode::ACCEPTED {
            debug!("No pending rollup request, trying again");
            return Ok(None);
        }

        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%code, %body, "Finish rejected by rollup server");
            return Err(RollupError::new(format!("/finish returned {}: {}", code, body)));
        }

        let raw: RawRequest = response.json().await?;
        info!(request_type = %raw.request_type, "Received rollup request");
        Ok(Some(raw))
    }

    /// Posts a JSON body to `endpoint`.
    #[instrument(skip(self, body))]
    async fn post<T: Serialize + Sync + ?Sized>(&self, endpoint: &str, body: &T) -> Result<(), RollupError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(body)
            .send()
            .await?;

        let code = response.status();
        let text = response.text().await.unwrap_or_default();
        info!(endpoint, %code, body = %text, "Received {} status", endpoint);

        if !code.is_success() {
            return Err(RollupError::new(format!("/{} returned {}: {}", endpoint, code, text)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Rollup for RollupClient {
    async fn notice(&self, payload: &[u8]) -> Result<(), RollupError> {
        self.post("notice", &PayloadBody { payload: encode_hex(payload) }).await
    }

    async fn report(&self, payload: &[u8]) -> Result<(), RollupError> {
        self.post("report", &PayloadBody { payload: encode_hex(payload) }).await
    }

    async fn voucher(&self, destination: &Address, payload: &[u8]) -> Result<(), RollupError> {
        let body = VoucherBody {
            destination: destination.to_string(),
            payload: encode_hex(payload),
        };
        self.post("voucher", &body).await
    }
}
