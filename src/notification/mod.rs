//! Notifications for the Pomodoro Timer.
//!
//! The engine only emits [`PeriodCompleted`]; this module turns it into
//! something a person sees. Whether to notify at all is decided by the
//! `show_notifications` setting, which the session layer reads.
//!
//! # Example
//!
//! ```rust
//! use pomodoro::notification::{create_completion_content, NotificationType};
//! use pomodoro::types::{Mode, PeriodCompleted};
//!
//! let content = create_completion_content(&PeriodCompleted {
//!     previous_mode: Mode::Work,
//!     next_mode: Mode::ShortBreak,
//!     is_long_break: false,
//! });
//! assert_eq!(content.kind, NotificationType::WorkComplete);
//! ```

mod content;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::types::PeriodCompleted;

pub use self::content::{
    create_completion_content, NotificationContent, NotificationType, PAUSED_NOTICE, RESET_NOTICE,
    STARTED_NOTICE,
};
pub use self::error::NotificationError;

#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    /// Delivers a completion notification.
    async fn send(&self, content: &NotificationContent) -> Result<(), NotificationError>;
    /// Delivers a short, transient notice.
    async fn notice(&self, message: &str) -> Result<(), NotificationError>;
    fn is_available(&self) -> bool;
}

/// Prints notifications to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn write(&self, text: String) -> Result<(), NotificationError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

impl NotificationSender for TerminalNotifier {
    async fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        self.write(format!("\n{}\n  {}\n", content.title, content.body))
            .await
    }

    async fn notice(&self, message: &str) -> Result<(), NotificationError> {
        self.write(format!("{}\n", message)).await
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct MockNotificationSender {
    notifications: Mutex<Vec<NotificationContent>>,
    notices: Mutex<Vec<String>>,
    unavailable: AtomicBool,
    should_fail: AtomicBool,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn get_notifications(&self) -> Vec<NotificationContent> {
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn get_notices(&self) -> Vec<String> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl NotificationSender for MockNotificationSender {
    async fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if !self.is_available() {
            return Err(NotificationError::NotAvailable);
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner).push(content.clone());
        Ok(())
    }

    async fn notice(&self, message: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}

/// Sends the notification for a completed period.
///
/// Delivery failures are logged and reported as `false`; they never reach
/// the caller as errors.
pub async fn send_completion_notification<N: NotificationSender>(
    sender: &N,
    completed: &PeriodCompleted,
) -> bool {
    if !sender.is_available() {
        return false;
    }
    let content = create_completion_content(completed);
    match sender.send(&content).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, kind = ?content.kind, "failed to send notification");
            false
        }
    }
}
