//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Timer engine cycling work periods and short/long breaks
//! - Type definitions for configuration and state
//! - Settings file loading and saving
//! - Notification and sound collaborators for completed periods
//! - CLI command parsing, display utilities and the interactive session

pub mod cli;
pub mod engine;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{TimerEngine, TimerEvent};
pub use types::{ConfigError, Mode, PeriodCompleted, PomodoroConfig, TimerState};

pub use notification::{
    MockNotificationSender, NotificationError, NotificationSender, NotificationType,
    TerminalNotifier,
};

pub use sound::{BellSoundPlayer, MockSoundPlayer, SoundError, SoundPlayer};

pub use settings::SettingsError;
