//! Engine module for the Pomodoro Timer.
//!
//! This module contains the core timer functionality:
//! - `timer`: Timer engine with mode transitions, countdown driver and auto-start

pub mod timer;

pub use timer::{TimerEngine, TimerEvent, AUTO_START_DELAY, TICK_INTERVAL};
