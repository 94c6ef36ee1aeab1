//! Configuration error types.
//!
//! Out-of-range settings are rejected here, at the configuration boundary,
//! so the timer engine itself never has to deal with invalid durations.

use thiserror::Error;

/// Errors produced when validating a [`PomodoroConfig`](super::PomodoroConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Work duration outside 1-60 minutes.
    #[error("work duration must be between 1 and 60 minutes (got {0})")]
    WorkDuration(u32),

    /// Short break outside 1-30 minutes.
    #[error("short break must be between 1 and 30 minutes (got {0})")]
    ShortBreak(u32),

    /// Long break outside 5-60 minutes.
    #[error("long break must be between 5 and 60 minutes (got {0})")]
    LongBreak(u32),

    /// Session threshold outside 2-10.
    #[error("sessions before long break must be between 2 and 10 (got {0})")]
    SessionsBeforeLongBreak(u32),
}

impl ConfigError {
    /// Returns the name of the offending setting.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::WorkDuration(_) => "work_duration",
            Self::ShortBreak(_) => "short_break",
            Self::LongBreak(_) => "long_break",
            Self::SessionsBeforeLongBreak(_) => "sessions_before_long_break",
        }
    }

    /// Returns the rejected value.
    #[must_use]
    pub fn value(&self) -> u32 {
        match self {
            Self::WorkDuration(v)
            | Self::ShortBreak(v)
            | Self::LongBreak(v)
            | Self::SessionsBeforeLongBreak(v) => *v,
        }
    }
}
