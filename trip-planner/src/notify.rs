//! Outbound notifications.
//!
//! Booking confirmations, receipts and cancellation notices are handed to
//! a `Notifier` and forgotten. A failed send is logged; it never undoes
//! the reservation change that triggered it.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::UserId;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Reservation created.
    BookingConfirmation,
    /// Payment went through.
    PaymentReceipt,
    /// Reservation cancelled.
    Cancellation,
    /// Status changed by an operator.
    StatusChange,
}

/// A notification waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: UserId,
    pub payload: serde_json::Value,
}

/// Error from a notification sender.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The delivery side has shut down
    #[error("notification channel closed")]
    Closed,

    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Sends notifications without waiting for delivery.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        kind: NotificationKind,
        recipient: &UserId,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError>;
}

/// Send a notification, logging instead of returning a failure.
pub fn send_or_log<N: Notifier + ?Sized>(
    notifier: &N,
    kind: NotificationKind,
    recipient: &UserId,
    payload: serde_json::Value,
) {
    if let Err(e) = notifier.notify(kind, recipient, payload) {
        warn!(?kind, recipient = %recipient, error = %e, "Failed to send notification");
    }
}

/// Notifier that queues onto an unbounded channel.
///
/// The receiving half is drained by [`spawn_dispatcher`] in the server,
/// or inspected directly in tests.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(
        &self,
        kind: NotificationKind,
        recipient: &UserId,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError> {
        self.tx
            .send(Notification {
                kind,
                recipient: recipient.clone(),
                payload,
            })
            .map_err(|_| NotifyError::Closed)
    }
}

/// Drain queued notifications in the background.
///
/// Delivery is external; the dispatcher records each notification in the
/// log. The task ends once every sender is dropped.
pub fn spawn_dispatcher(mut rx: mpsc::UnboundedReceiver<Notification>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut delivered = 0;
        while let Some(notification) = rx.recv().await {
            info!(
                kind = ?notification.kind,
                recipient = %notification.recipient,
                payload = %notification.payload,
                "Dispatching notification"
            );
            delivered += 1;
        }
        delivered
    })
}
