//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to deliver a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// The notification target is not available.
    #[error("notification output is not available")]
    NotAvailable,
}

impl From<std::io::Error> for NotificationError {
    fn from(err: std::io::Error) -> Self {
        Self::SendFailed(err.to_string())
    }
}
