//! Notification content construction.
//!
//! Picks the title and body shown when a period completes, plus the short
//! notices shown for start, pause and reset.

use crate::types::{Mode, PeriodCompleted};

/// Types of notifications that can be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Work session completed.
    WorkComplete,
    /// Short break completed.
    BreakComplete,
    /// Long break completed.
    LongBreakComplete,
}

impl NotificationType {
    /// Classifies a completion by the mode that just finished.
    #[must_use]
    pub fn for_completion(completed: &PeriodCompleted) -> Self {
        match completed.previous_mode {
            Mode::Work => Self::WorkComplete,
            Mode::ShortBreak => Self::BreakComplete,
            Mode::LongBreak => Self::LongBreakComplete,
        }
    }
}

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub kind: NotificationType,
    pub title: String,
    pub body: String,
}

/// Builds the notification shown for a completed period.
#[must_use]
pub fn create_completion_content(completed: &PeriodCompleted) -> NotificationContent {
    let kind = NotificationType::for_completion(completed);
    let (title, body) = match kind {
        NotificationType::WorkComplete if completed.next_mode == Mode::LongBreak => (
            "🍅 Pomodoro Timer",
            "Work session complete! Time for a long break.",
        ),
        NotificationType::WorkComplete => (
            "🍅 Pomodoro Timer",
            "Work session complete! Time for a break.",
        ),
        NotificationType::BreakComplete => ("☕ Pomodoro Timer", "Break complete! Ready to focus?"),
        NotificationType::LongBreakComplete => (
            "☕ Pomodoro Timer",
            "Long break complete! Ready for a new set?",
        ),
    };

    NotificationContent {
        kind,
        title: title.to_string(),
        body: body.to_string(),
    }
}

/// Notice shown when the countdown starts.
pub const STARTED_NOTICE: &str = "Pomodoro started!";

/// Notice shown when the countdown pauses.
pub const PAUSED_NOTICE: &str = "Pomodoro paused";

/// Notice shown after a reset.
pub const RESET_NOTICE: &str = "Timer reset";
