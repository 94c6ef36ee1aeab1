//! Sound system error types.
//!
//! Sound playback is a collaborator concern: these errors are logged by the
//! caller and never reach the timer engine.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No output is available (e.g. stdout is not a terminal).
    #[error("audio output is not available: {0}")]
    DeviceNotAvailable(String),

    /// Writing the cue failed.
    #[error("sound playback failed: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to output availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_))
    }
}

impl From<std::io::Error> for SoundError {
    fn from(err: std::io::Error) -> Self {
        Self::PlaybackError(err.to_string())
    }
}
