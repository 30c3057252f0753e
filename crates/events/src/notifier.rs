//! The notifier seam and fire-and-forget dispatch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::delivery::email::EmailError;

/// A single outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Send `notification` on a background task.
///
/// The caller never waits on delivery and never sees its failure; errors
/// are logged at `warn`.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!(
                to = %notification.to,
                subject = %notification.subject,
                error = %e,
                "Notification delivery failed",
            );
        }
    });
}
