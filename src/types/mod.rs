//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - The three timer modes
//! - Timer configuration with validation
//! - Timer state and its pure transition logic
//! - The completion record handed to collaborators

mod error;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Allowed work duration in minutes.
pub const WORK_DURATION_RANGE: RangeInclusive<u32> = 1..=60;

/// Allowed short break duration in minutes.
pub const SHORT_BREAK_RANGE: RangeInclusive<u32> = 1..=30;

/// Allowed long break duration in minutes.
pub const LONG_BREAK_RANGE: RangeInclusive<u32> = 5..=60;

/// Allowed number of work sessions before a long break.
pub const SESSIONS_BEFORE_LONG_BREAK_RANGE: RangeInclusive<u32> = 2..=10;

// ============================================================================
// Mode
// ============================================================================

/// The kind of period the timer is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Focused work period
    #[default]
    Work,
    /// Short break between work periods
    ShortBreak,
    /// Long break after a full set of work periods
    LongBreak,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortBreak => "Short break",
            Mode::LongBreak => "Long break",
        }
    }

    /// Returns true for either break variant.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Configuration for the Pomodoro timer.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partially written settings file is merged over [`PomodoroConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroConfig {
    /// Work duration in minutes (1-60)
    pub work_duration: u32,
    /// Short break duration in minutes (1-30)
    pub short_break: u32,
    /// Long break duration in minutes (5-60)
    pub long_break: u32,
    /// Work sessions completed before a long break replaces the short one (2-10)
    pub sessions_before_long_break: u32,
    /// Start breaks automatically after a work period
    pub auto_start_breaks: bool,
    /// Start work automatically after a break
    pub auto_start_pomodoros: bool,
    /// Read by the notification collaborator
    pub show_notifications: bool,
    /// Read by the sound collaborator
    pub play_sound: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break: 5,
            long_break: 15,
            sessions_before_long_break: 4,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            show_notifications: true,
            play_sound: true,
        }
    }
}

impl PomodoroConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_duration(mut self, minutes: u32) -> Self {
        self.work_duration = minutes;
        self
    }

    /// Creates a new configuration with the specified short break.
    pub fn with_short_break(mut self, minutes: u32) -> Self {
        self.short_break = minutes;
        self
    }

    /// Creates a new configuration with the specified long break.
    pub fn with_long_break(mut self, minutes: u32) -> Self {
        self.long_break = minutes;
        self
    }

    /// Creates a new configuration with the specified session threshold.
    pub fn with_sessions_before_long_break(mut self, sessions: u32) -> Self {
        self.sessions_before_long_break = sessions;
        self
    }

    /// Validates every numeric setting against its documented range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !WORK_DURATION_RANGE.contains(&self.work_duration) {
            return Err(ConfigError::WorkDuration(self.work_duration));
        }
        if !SHORT_BREAK_RANGE.contains(&self.short_break) {
            return Err(ConfigError::ShortBreak(self.short_break));
        }
        if !LONG_BREAK_RANGE.contains(&self.long_break) {
            return Err(ConfigError::LongBreak(self.long_break));
        }
        if !SESSIONS_BEFORE_LONG_BREAK_RANGE.contains(&self.sessions_before_long_break) {
            return Err(ConfigError::SessionsBeforeLongBreak(
                self.sessions_before_long_break,
            ));
        }
        Ok(())
    }

    /// Configured length of `mode` in whole seconds.
    pub fn duration_seconds(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Work => self.work_duration,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        };
        minutes * 60
    }

    /// Returns true when `completed_work_sessions` lands on a long break.
    pub fn is_long_break_due(&self, completed_work_sessions: u32) -> bool {
        completed_work_sessions.checked_rem(self.sessions_before_long_break) == Some(0)
    }

    /// Break variant that follows (or is in progress after) the given count.
    pub fn break_mode_for(&self, completed_work_sessions: u32) -> Mode {
        if self.is_long_break_due(completed_work_sessions) {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        }
    }

    /// Returns whether entering `mode` should schedule an automatic start.
    pub fn auto_starts(&self, mode: Mode) -> bool {
        match mode {
            Mode::Work => self.auto_start_pomodoros,
            Mode::ShortBreak | Mode::LongBreak => self.auto_start_breaks,
        }
    }
}

// ============================================================================
// PeriodCompleted
// ============================================================================

/// Record of a single mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCompleted {
    /// Mode that just finished
    pub previous_mode: Mode,
    /// Mode that was entered
    pub next_mode: Mode,
    /// True when the transition enters or leaves a long break
    pub is_long_break: bool,
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: Mode,
    /// Remaining seconds in the current period
    pub time_remaining_seconds: u32,
    /// Configured length of the current period in seconds
    pub total_time_seconds: u32,
    /// Whether a countdown driver is active
    pub is_running: bool,
    /// Number of completed work periods
    pub completed_work_sessions: u32,
}

impl TimerState {
    /// Creates the initial state: an idle, full-length work period.
    pub fn new(config: &PomodoroConfig) -> Self {
        let seconds = config.duration_seconds(Mode::Work);
        Self {
            mode: Mode::Work,
            time_remaining_seconds: seconds,
            total_time_seconds: seconds,
            is_running: false,
            completed_work_sessions: 0,
        }
    }

    /// Switches to `mode` with a full-length period.
    pub fn enter_mode(&mut self, mode: Mode, config: &PomodoroConfig) {
        let seconds = config.duration_seconds(mode);
        self.mode = mode;
        self.total_time_seconds = seconds;
        self.time_remaining_seconds = seconds;
    }

    /// Decrements the countdown by one second, clamping at zero.
    ///
    /// Returns true if the period has run out.
    pub fn tick(&mut self) -> bool {
        self.time_remaining_seconds = self.time_remaining_seconds.saturating_sub(1);
        self.time_remaining_seconds == 0
    }

    /// Finishes the current period and enters the next one.
    ///
    /// The work counter is incremented before the break variant is chosen,
    /// so the long break lands on every `sessions_before_long_break`-th work
    /// period.
    pub fn complete(&mut self, config: &PomodoroConfig) -> PeriodCompleted {
        self.is_running = false;

        let previous_mode = self.mode;
        let next_mode = match previous_mode {
            Mode::Work => {
                self.completed_work_sessions += 1;
                config.break_mode_for(self.completed_work_sessions)
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        };

        self.enter_mode(next_mode, config);

        PeriodCompleted {
            previous_mode,
            next_mode,
            is_long_break: previous_mode == Mode::LongBreak || next_mode == Mode::LongBreak,
        }
    }

    /// Stops the countdown and refills the current period.
    ///
    /// In a break the short/long variant is derived again from the current
    /// counter instead of being remembered.
    pub fn reset(&mut self, config: &PomodoroConfig) {
        self.is_running = false;
        let mode = if self.mode.is_break() {
            config.break_mode_for(self.completed_work_sessions)
        } else {
            Mode::Work
        };
        self.enter_mode(mode, config);
    }

    /// Returns true if the period has not been counted down at all.
    pub fn is_untouched(&self) -> bool {
        self.time_remaining_seconds == self.total_time_seconds
    }

    /// Elapsed fraction of the current period (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.total_time_seconds == 0 {
            return 1.0;
        }
        1.0 - f64::from(self.time_remaining_seconds) / f64::from(self.total_time_seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
