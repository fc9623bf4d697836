//! Simulated asynchronous payment.
//!
//! A payment is a spawned task that waits for the configured delay and
//! then settles the reservation. Aborting the handle before the delay
//! elapses leaves the reservation exactly as it was. The task logs its own
//! outcome, since handles tracked by the web layer are never awaited.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{CoreError, Reservation, ReservationId};

/// Configuration for payment processing.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Time between starting a payment and settling it.
    pub delay: Duration,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
        }
    }
}

/// Error from a payment task.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentError {
    /// Payment was aborted before it settled
    #[error("payment for reservation {0} was aborted")]
    Aborted(ReservationId),

    /// Settling the reservation failed
    #[error("payment for reservation {id} failed: {source}")]
    Failed {
        id: ReservationId,
        #[source]
        source: CoreError,
    },

    /// The payment task panicked
    #[error("payment task for reservation {0} panicked")]
    Panicked(ReservationId),
}

/// Handle to an in-flight payment.
#[derive(Debug)]
pub struct PaymentHandle {
    reservation: ReservationId,
    task: JoinHandle<Result<Reservation, CoreError>>,
}

impl PaymentHandle {
    /// Start a payment that runs `settle` once `delay` has elapsed.
    ///
    /// `settle` is not polled before the delay, so nothing it does is
    /// visible if the payment is aborted first.
    pub fn spawn<F>(reservation: ReservationId, delay: Duration, settle: F) -> Self
    where
        F: Future<Output = Result<Reservation, CoreError>> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = settle.await;
            match &result {
                Ok(_) => debug!(reservation = %reservation, "Payment settled"),
                Err(e @ CoreError::TerminalState { .. }) => {
                    info!(reservation = %reservation, error = %e, "Payment not applied")
                }
                Err(e) => warn!(reservation = %reservation, error = %e, "Payment failed"),
            }
            result
        });
        debug!(reservation = %reservation, ?delay, "Payment started");
        Self { reservation, task }
    }

    pub fn reservation(&self) -> ReservationId {
        self.reservation
    }

    /// Cancel the payment if it has not settled yet.
    pub fn abort(&self) {
        if !self.task.is_finished() {
            debug!(reservation = %self.reservation, "Payment aborted");
        }
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the payment to settle.
    pub async fn wait(self) -> Result<Reservation, PaymentError> {
        let id = self.reservation;
        match self.task.await {
            Ok(Ok(reservation)) => Ok(reservation),
            Ok(Err(source)) => Err(PaymentError::Failed { id, source }),
            Err(e) if e.is_cancelled() => Err(PaymentError::Aborted(id)),
            Err(_) => Err(PaymentError::Panicked(id)),
        }
    }
}
