//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: Interactive session driving the timer engine

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, ConfigAction, RunArgs};
pub use display::Display;
pub use session::{Session, SessionCommand, UnknownCommand};
