//! Sound cues for the Pomodoro Timer.
//!
//! The engine never plays sound itself. The session layer reads the
//! `play_sound` setting and asks a [`SoundPlayer`] for a cue when a period
//! completes. Failures are logged and swallowed so the countdown keeps going.

mod error;

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::{debug, warn};

pub use error::SoundError;

/// ASCII bell.
const BELL: &[u8] = b"\x07";

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., terminal bell, mock for testing).
pub trait SoundPlayer {
    /// Plays the completion cue. Must not block for long.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self) -> Result<(), SoundError>;

    /// Returns true if the output is available.
    fn is_available(&self) -> bool;
}

/// Rings the terminal bell on stdout.
#[derive(Debug, Default)]
pub struct BellSoundPlayer;

impl BellSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SoundPlayer for BellSoundPlayer {
    fn play(&self) -> Result<(), SoundError> {
        if !self.is_available() {
            return Err(SoundError::DeviceNotAvailable(
                "stdout is not a terminal".to_string(),
            ));
        }
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(BELL)?;
        stdout.flush()?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_count: AtomicUsize,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_count: AtomicUsize::new(0),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_count.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Plays the completion cue, logging instead of propagating failures.
///
/// Returns true if the cue was played.
pub fn play_completion_sound<P: SoundPlayer + ?Sized>(player: &P) -> bool {
    if !player.is_available() {
        debug!("sound output unavailable, skipping cue");
        return false;
    }
    match player.play() {
        Ok(()) => true,
        Err(e) if e.is_device_error() => {
            debug!(error = %e, "sound output went away");
            false
        }
        Err(e) => {
            warn!(error = %e, "failed to play sound");
            false
        }
    }
}
