//! Log-only notifier used when SMTP is not configured.

use async_trait::async_trait;

use crate::notifier::{Notification, Notifier, NotifyError};

/// Writes each notification's envelope to the tracing log instead of
/// sending it. Bodies can carry sign-in codes and are never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            body_len = notification.body.len(),
            "SMTP not configured, notification logged only",
        );
        Ok(())
    }
}
