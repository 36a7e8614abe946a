//! The sequential poll loop.

use crate::dispatcher::Dispatcher;
use crate::rollup::{FinishStatus, RequestError, Rollup, RollupClient, RollupError, RollupRequest};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Polls the rollup server and feeds each request to the dispatcher.
///
/// Exactly one request is in flight at a time: the verdict on request *n*
/// travels with the `/finish` call that fetches request *n + 1*.
#[derive(Debug)]
pub struct Runner {
    client: RollupClient,
    dispatcher: Dispatcher,
    retry_delay: Duration,
}

impl Runner {
    /// Creates a runner.
    #[instrument(skip(client, dispatcher))]
    pub fn new(client: RollupClient, dispatcher: Dispatcher, retry_delay: Duration) -> Self {
        Self {
            client,
            dispatcher,
            retry_delay,
        }
    }

    /// Runs until `shutdown` resolves, then hands back the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`RollupError`] when the server sends a request type with no
    /// handler. Transport failures are logged and retried; a known request
    /// type with a malformed body is reported and rejected.
    #[instrument(skip_all, fields(rollup_url = %self.client.base_url()))]
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<Dispatcher, RollupError>
    where
        F: Future<Output = ()>,
    {
        info!("Starting rollup poll loop");
        tokio::pin!(shutdown);

        let mut status = FinishStatus::Accept;
        loop {
            let step = tokio::select! {
                _ = &mut shutdown => None,
                step = self.step(status) => Some(step),
            };
            match step {
                Some(next) => status = next?,
                None => break,
            }
        }

        info!("Poll loop stopped");
        Ok(self.dispatcher)
    }

    /// One `/finish` round trip, plus handling of whatever it returned.
    async fn step(&mut self, status: FinishStatus) -> Result<FinishStatus, RollupError> {
        let raw = match self.client.finish(status).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(status),
            Err(err) => {
                warn!(error = %err, delay_ms = self.retry_delay.as_millis() as u64, "Rollup server unavailable, retrying");
                tokio::time::sleep(self.retry_delay).await;
                return Ok(status);
            }
        };

        let request = match RollupRequest::try_from(raw) {
            Ok(request) => request,
            Err(RequestError::UnknownType(request_type)) => {
                return Err(RollupError::new(format!(
                    "Unknown request type '{}'",
                    request_type
                )));
            }
            Err(err) => {
                warn!(error = %err, "Rejecting malformed request");
                if let Err(report_err) = self.client.report(err.to_string().as_bytes()).await {
                    error!(error = %report_err, "Failed to deliver diagnostic report");
                }
                return Ok(FinishStatus::Reject);
            }
        };
        let next = self.dispatcher.dispatch(&self.client, &request).await;
        info!(%next, "Request handled");
        Ok(next)
    }
}
