//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - Timer status and session progress
//! - Engine events (ticks are drawn on one line)
//! - Error messages

use std::io::Write;

use crate::engine::TimerEvent;
use crate::types::{PomodoroConfig, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats seconds as `MM:SS`. Minutes are not wrapped at 60.
    #[must_use]
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Returns e.g. `Session 2 of 4`.
    #[must_use]
    pub fn session_label(state: &TimerState, config: &PomodoroConfig) -> String {
        format!(
            "Session {} of {}",
            state.completed_work_sessions.saturating_add(1),
            config.sessions_before_long_break
        )
    }

    /// Short one-line label: the countdown while running, a title otherwise.
    #[must_use]
    pub fn status_label(state: &TimerState) -> String {
        if state.is_running {
            format!("Pomodoro: {}", Self::format_time(state.time_remaining_seconds))
        } else {
            "Pomodoro Timer".to_string()
        }
    }

    /// Renders the multi-line status block.
    #[must_use]
    pub fn render_status(state: &TimerState, config: &PomodoroConfig) -> String {
        let run_state = if state.is_running {
            "running"
        } else if state.is_untouched() {
            "ready"
        } else {
            "paused"
        };
        format!(
            "Pomodoro Timer status\n\
             ─────────────────────\n\
             Mode:      {}\n\
             State:     {}\n\
             Remaining: {} / {}\n\
             Progress:  {:.0}%\n\
             {}",
            state.mode.label(),
            run_state,
            Self::format_time(state.time_remaining_seconds),
            Self::format_time(state.total_time_seconds),
            state.progress() * 100.0,
            Self::session_label(state, config),
        )
    }

    /// Describes an engine event, or `None` for events drawn in place.
    #[must_use]
    pub fn describe_event(event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Started { mode } => Some(format!("> {} started", mode.label())),
            TimerEvent::Paused { remaining_seconds } => Some(format!(
                "|| Paused ({} left)",
                Self::format_time(*remaining_seconds)
            )),
            TimerEvent::Reset {
                mode,
                remaining_seconds,
            } => Some(format!(
                "[] {} reset to {}",
                mode.label(),
                Self::format_time(*remaining_seconds)
            )),
            TimerEvent::Tick { .. } => None,
            TimerEvent::PeriodCompleted(completed) => Some(format!(
                "* {} finished, next: {}",
                completed.previous_mode.label(),
                completed.next_mode.label()
            )),
            TimerEvent::AutoStartScheduled { mode } => {
                Some(format!("  {} starts automatically", mode.label()))
            }
        }
    }

    /// Shows the current timer status.
    pub fn show_status(state: &TimerState, config: &PomodoroConfig) {
        println!("{}", Self::render_status(state, config));
    }

    /// Prints an event on its own line.
    pub fn show_event(event: &TimerEvent) {
        if let Some(line) = Self::describe_event(event) {
            println!("\r{}", line);
        }
    }

    /// Redraws the countdown line in place.
    pub fn show_tick(remaining_seconds: u32) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}  ", Self::format_time(remaining_seconds));
        let _ = stdout.flush();
    }

    /// Shows the command help for an interactive session.
    pub fn show_session_help() {
        println!("Commands: start, pause, toggle, reset, skip, status, quit");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
