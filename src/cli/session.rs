//! Interactive timer session.
//!
//! Reads one command per line, forwards it to the [`TimerEngine`] and reacts
//! to the engine's events: the countdown is redrawn in place, and completed
//! periods trigger a notification and a sound cue according to the
//! `show_notifications` and `play_sound` settings.

use std::future::Future;
use std::ops::ControlFlow;
use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{TimerEngine, TimerEvent};
use crate::notification::{
    send_completion_notification, NotificationSender, PAUSED_NOTICE, RESET_NOTICE, STARTED_NOTICE,
};
use crate::sound::{play_completion_sound, SoundPlayer};

use super::display::Display;

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed into a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    /// Start when idle, pause when running
    Toggle,
    Reset,
    Skip,
    Status,
    Help,
    Quit,
}

/// Returned for input that is not a session command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for SessionCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "resume" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "toggle" | "t" => Ok(Self::Toggle),
            "reset" => Ok(Self::Reset),
            "skip" => Ok(Self::Skip),
            "status" | "s" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Couples the engine with its notification and sound collaborators.
pub struct Session<N, S> {
    engine: TimerEngine,
    notifier: N,
    sound: S,
}

impl<N: NotificationSender, S: SoundPlayer> Session<N, S> {
    pub fn new(engine: TimerEngine, notifier: N, sound: S) -> Self {
        Self {
            engine,
            notifier,
            sound,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Applies one command. Breaks on `quit`.
    pub fn handle_command(&self, command: SessionCommand) -> ControlFlow<()> {
        debug!(?command, "session command");
        match command {
            SessionCommand::Start => self.engine.start(),
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Toggle => {
                if self.engine.is_running() {
                    self.engine.pause();
                } else {
                    self.engine.start();
                }
            }
            SessionCommand::Reset => self.engine.reset(),
            SessionCommand::Skip => self.engine.skip(),
            SessionCommand::Status => {
                Display::show_status(&self.engine.snapshot(), &self.engine.config());
            }
            SessionCommand::Help => Display::show_session_help(),
            SessionCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Parses and applies one input line. Blank lines are ignored.
    pub fn handle_line(&self, line: &str) -> ControlFlow<()> {
        if line.trim().is_empty() {
            return ControlFlow::Continue(());
        }
        match line.parse::<SessionCommand>() {
            Ok(command) => self.handle_command(command),
            Err(e) => {
                Display::show_error(&e.to_string());
                Display::show_session_help();
                ControlFlow::Continue(())
            }
        }
    }

    /// Reacts to one engine event.
    pub async fn handle_event(&self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick { remaining_seconds } => Display::show_tick(*remaining_seconds),
            TimerEvent::Started { .. } => self.notice(STARTED_NOTICE).await,
            TimerEvent::Paused { .. } => self.notice(PAUSED_NOTICE).await,
            TimerEvent::Reset { .. } => self.notice(RESET_NOTICE).await,
            TimerEvent::PeriodCompleted(completed) => {
                Display::show_event(event);
                let config = self.engine.config();
                if config.show_notifications {
                    send_completion_notification(&self.notifier, completed).await;
                }
                if config.play_sound {
                    play_completion_sound(&self.sound);
                }
            }
            TimerEvent::AutoStartScheduled { .. } => Display::show_event(event),
        }
    }

    async fn notice(&self, message: &str) {
        if let Err(e) = self.notifier.notice(message).await {
            warn!(error = %e, "failed to show notice");
        }
    }

    /// Runs until `quit`, end of input, or `shutdown` resolves.
    ///
    /// The engine is shut down on the way out, cancelling the countdown and
    /// any pending auto-start. Events already queued are still handled.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input fails.
    pub async fn run<R, F>(
        &self,
        input: R,
        mut events: mpsc::UnboundedReceiver<TimerEvent>,
        shutdown: F,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(shutdown);

        info!("session running");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("interrupted, shutting down");
                    break;
                }

                Some(event) = events.recv() => {
                    self.handle_event(&event).await;
                }

                line = lines.next_line() => {
                    match line.context("failed to read command")? {
                        Some(line) => {
                            if self.handle_line(&line).is_break() {
                                break;
                            }
                        }
                        None => {
                            debug!("input closed");
                            break;
                        }
                    }
                }
            }
        }

        self.engine.shutdown();
        while let Ok(event) = events.try_recv() {
            self.handle_event(&event).await;
        }

        info!("session finished");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
