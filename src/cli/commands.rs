//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::PomodoroConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI - work and break intervals in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro",
    version,
    about = "Pomodoro interval timer for the terminal",
    long_about = "Counts down work periods and short/long breaks.\n\
                  Type start, pause, toggle, reset, skip, status or quit while a session runs.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the settings file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings file actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective settings as JSON
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command.
///
/// Every option overrides the matching value from the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=30)
    )]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (5-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(5..=60)
    )]
    pub long_break: Option<u32>,

    /// Work sessions before a long break (2-10)
    #[arg(
        short = 'n',
        long,
        value_parser = clap::value_parser!(u32).range(2..=10)
    )]
    pub sessions: Option<u32>,

    /// Start breaks automatically when a work period ends
    #[arg(long)]
    pub auto_start_breaks: bool,

    /// Start work periods automatically when a break ends
    #[arg(long)]
    pub auto_start_pomodoros: bool,

    /// Disable completion notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Start the first work period immediately
    #[arg(long)]
    pub start: bool,
}

impl RunArgs {
    /// Applies the command-line overrides on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: PomodoroConfig) -> PomodoroConfig {
        if let Some(work) = self.work {
            config.work_duration = work;
        }
        if let Some(short_break) = self.short_break {
            config.short_break = short_break;
        }
        if let Some(long_break) = self.long_break {
            config.long_break = long_break;
        }
        if let Some(sessions) = self.sessions {
            config.sessions_before_long_break = sessions;
        }
        if self.auto_start_breaks {
            config.auto_start_breaks = true;
        }
        if self.auto_start_pomodoros {
            config.auto_start_pomodoros = true;
        }
        if self.no_notifications {
            config.show_notifications = false;
        }
        if self.no_sound {
            config.play_sound = false;
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================
