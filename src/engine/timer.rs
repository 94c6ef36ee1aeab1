//! Timer engine for the Pomodoro Timer.
//!
//! This module provides the core timer functionality:
//! - Mode transitions (Work → ShortBreak/LongBreak → Work)
//! - Countdown with a single `tokio::time::interval` driver task
//! - Event firing for notifications and sounds
//! - Deferred auto-start of the next period
//! - Long break after every `sessions_before_long_break` work periods
//!
//! The engine is a cheap cloneable handle. Every operation and every driver
//! tick runs under one lock, so a tick (including any transition it causes)
//! finishes before the next tick or external call is looked at. Background
//! tasks only hold a weak reference; dropping the last handle or calling
//! [`TimerEngine::shutdown`] cancels them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::types::{ConfigError, Mode, PeriodCompleted, PomodoroConfig, TimerState};

/// Countdown granularity.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay before an automatic start fires after a transition.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(2);

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for notifications and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Mode being counted down
        mode: Mode,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds at the time of the pause
        remaining_seconds: u32,
    },
    /// Current period refilled
    Reset {
        /// Mode after the reset
        mode: Mode,
        /// Remaining seconds after the reset
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A period finished and the next one was entered (once per transition)
    PeriodCompleted(PeriodCompleted),
    /// An automatic start was scheduled for the entered mode
    AutoStartScheduled {
        /// Mode that will start
        mode: Mode,
    },
}

// ============================================================================
// Inner state
// ============================================================================

struct Inner {
    state: TimerState,
    config: PomodoroConfig,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Active countdown driver, if any
    driver: Option<JoinHandle<()>>,
    /// Bumped whenever a driver is started or stopped
    driver_generation: u64,
    /// Pending deferred start, if any
    auto_start: Option<JoinHandle<()>>,
    /// Bumped whenever an auto-start is scheduled or cancelled
    auto_start_generation: u64,
    shut_down: bool,
}

impl Inner {
    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("timer event dropped: no receiver");
        }
    }

    fn stop_driver(&mut self) {
        self.driver_generation += 1;
        if let Some(handle) = self.driver.take() {
            handle.abort();
        }
        self.state.is_running = false;
    }

    fn cancel_auto_start(&mut self) {
        self.auto_start_generation += 1;
        if let Some(handle) = self.auto_start.take() {
            handle.abort();
            debug!("pending auto-start cancelled");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.stop_driver();
        self.cancel_auto_start();
    }
}

type Shared = Arc<Mutex<Inner>>;

fn lock(shared: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // A panic while holding the lock leaves plain data behind; keep going.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the Pomodoro state machine and its countdown.
///
/// Operations that start background work (`start`, `skip`, and the countdown
/// itself when auto-start is enabled) spawn Tokio tasks and must therefore be
/// called from within a Tokio runtime.
#[derive(Clone)]
pub struct TimerEngine {
    inner: Shared,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("TimerEngine")
            .field("state", &inner.state)
            .field("config", &inner.config)
            .field("auto_start_pending", &inner.auto_start.is_some())
            .finish()
    }
}

impl TimerEngine {
    /// Creates an idle engine at the start of a work period.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn new(
        config: PomodoroConfig,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = TimerState::new(&config);
        Ok(Self::from_parts(config, state, event_tx))
    }

    /// Rebuilds an idle engine from a previously taken snapshot.
    ///
    /// The running flag is cleared and the remaining time is clamped to the
    /// period length; a snapshot with no period length gets a full period.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn restore(
        config: PomodoroConfig,
        mut state: TimerState,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        state.is_running = false;
        if state.total_time_seconds == 0 {
            let mode = state.mode;
            state.enter_mode(mode, &config);
        }
        state.time_remaining_seconds = state.time_remaining_seconds.min(state.total_time_seconds);
        Ok(Self::from_parts(config, state, event_tx))
    }

    fn from_parts(
        config: PomodoroConfig,
        state: TimerState,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                config,
                event_tx,
                driver: None,
                driver_generation: 0,
                auto_start: None,
                auto_start_generation: 0,
                shut_down: false,
            })),
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Starts (or resumes) the countdown. No-op while already running.
    pub fn start(&self) {
        let mut inner = lock(&self.inner);
        start_locked(&mut inner, &self.inner);
    }

    /// Pauses the countdown, keeping the remaining time.
    ///
    /// A pending auto-start is cancelled as well; otherwise this is a no-op
    /// when the countdown is not running.
    pub fn pause(&self) {
        let mut inner = lock(&self.inner);
        inner.cancel_auto_start();
        if !inner.state.is_running {
            return;
        }

        inner.stop_driver();
        let remaining_seconds = inner.state.time_remaining_seconds;
        debug!(remaining_seconds, "timer paused");
        inner.emit(TimerEvent::Paused { remaining_seconds });
    }

    /// Pauses and refills the current period.
    ///
    /// In a break the short/long variant is derived again from the current
    /// work session count; the count itself is not touched.
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        reset_locked(&mut inner);
    }

    /// Finishes the current period immediately, exactly as if the countdown
    /// had reached zero.
    pub fn skip(&self) {
        let mut inner = lock(&self.inner);
        if inner.shut_down {
            return;
        }
        debug!(mode = inner.state.mode.as_str(), "period skipped");
        complete_locked(&mut inner, &self.inner);
    }

    /// Replaces the configuration.
    ///
    /// The new durations apply from the next mode entry. The current period is
    /// only resized when the engine is idle and the period has not been
    /// counted down yet; a paused, partially elapsed period keeps its length.
    ///
    /// # Errors
    ///
    /// Returns an error and keeps the previous configuration if the new one
    /// is out of range.
    pub fn update_configuration(&self, config: PomodoroConfig) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            warn!(field = e.field(), value = e.value(), "configuration rejected");
            return Err(e);
        }

        let mut inner = lock(&self.inner);
        inner.config = config;

        if !inner.state.is_running && inner.state.is_untouched() {
            let inner = &mut *inner;
            inner.state.reset(&inner.config);
            debug!(
                mode = inner.state.mode.as_str(),
                total_seconds = inner.state.total_time_seconds,
                "idle period resized to new configuration"
            );
        }

        info!("configuration updated");
        Ok(())
    }

    /// Cancels the countdown driver and any pending auto-start.
    ///
    /// The engine stays readable afterwards but ignores `start` and `skip`.
    pub fn shutdown(&self) {
        let mut inner = lock(&self.inner);
        inner.stop_driver();
        inner.cancel_auto_start();
        inner.shut_down = true;
        info!("timer engine shut down");
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> TimerState {
        lock(&self.inner).state.clone()
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        lock(&self.inner).state.mode
    }

    /// Returns the remaining seconds in the current period.
    pub fn time_remaining_seconds(&self) -> u32 {
        lock(&self.inner).state.time_remaining_seconds
    }

    /// Returns the configured length of the current period in seconds.
    pub fn total_time_seconds(&self) -> u32 {
        lock(&self.inner).state.total_time_seconds
    }

    /// Returns true while the countdown driver is active.
    pub fn is_running(&self) -> bool {
        lock(&self.inner).state.is_running
    }

    /// Returns the number of completed work periods.
    pub fn completed_work_sessions(&self) -> u32 {
        lock(&self.inner).state.completed_work_sessions
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> PomodoroConfig {
        lock(&self.inner).config.clone()
    }

    /// Returns true while a deferred auto-start is waiting to fire.
    pub fn is_auto_start_pending(&self) -> bool {
        lock(&self.inner).auto_start.is_some()
    }
}

// ============================================================================
// Locked transitions
// ============================================================================

fn start_locked(inner: &mut Inner, shared: &Shared) {
    if inner.shut_down || inner.state.is_running {
        return;
    }

    inner.cancel_auto_start();
    inner.state.is_running = true;
    inner.driver_generation += 1;

    let generation = inner.driver_generation;
    let first_tick = Instant::now() + TICK_INTERVAL;
    inner.driver = Some(tokio::spawn(run_driver(
        Arc::downgrade(shared),
        generation,
        first_tick,
    )));

    let mode = inner.state.mode;
    debug!(
        mode = mode.as_str(),
        remaining_seconds = inner.state.time_remaining_seconds,
        "timer started"
    );
    inner.emit(TimerEvent::Started { mode });
}

fn reset_locked(inner: &mut Inner) {
    inner.stop_driver();
    inner.cancel_auto_start();
    inner.state.reset(&inner.config);

    let mode = inner.state.mode;
    let remaining_seconds = inner.state.time_remaining_seconds;
    debug!(mode = mode.as_str(), remaining_seconds, "timer reset");
    inner.emit(TimerEvent::Reset {
        mode,
        remaining_seconds,
    });
}

fn complete_locked(inner: &mut Inner, shared: &Shared) {
    inner.stop_driver();
    inner.cancel_auto_start();

    let completed = inner.state.complete(&inner.config);
    info!(
        previous = completed.previous_mode.as_str(),
        next = completed.next_mode.as_str(),
        completed_work_sessions = inner.state.completed_work_sessions,
        "period completed"
    );
    inner.emit(TimerEvent::PeriodCompleted(completed));

    if inner.config.auto_starts(completed.next_mode) {
        schedule_auto_start(inner, shared, completed.next_mode);
    }
}

fn schedule_auto_start(inner: &mut Inner, shared: &Shared, mode: Mode) {
    inner.cancel_auto_start();
    let generation = inner.auto_start_generation;
    let deadline = Instant::now() + AUTO_START_DELAY;
    inner.auto_start = Some(tokio::spawn(run_auto_start(
        Arc::downgrade(shared),
        generation,
        deadline,
    )));

    debug!(mode = mode.as_str(), "auto-start scheduled");
    inner.emit(TimerEvent::AutoStartScheduled { mode });
}

// ============================================================================
// Background tasks
// ============================================================================

/// Countdown driver. Exits as soon as its generation is superseded.
async fn run_driver(engine: Weak<Mutex<Inner>>, generation: u64, first_tick: Instant) {
    let mut ticker = interval_at(first_tick, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if !on_tick(&engine, generation) {
            break;
        }
    }
}

/// Handles one driver tick. Returns false when the driver should exit.
fn on_tick(engine: &Weak<Mutex<Inner>>, generation: u64) -> bool {
    let Some(shared) = engine.upgrade() else {
        return false;
    };
    let mut inner = lock(&shared);

    if inner.driver_generation != generation || !inner.state.is_running {
        return false;
    }

    let finished = inner.state.tick();
    let remaining_seconds = inner.state.time_remaining_seconds;
    inner.emit(TimerEvent::Tick { remaining_seconds });

    if finished {
        complete_locked(&mut inner, &shared);
        return false;
    }
    true
}

/// One-shot deferred start.
async fn run_auto_start(engine: Weak<Mutex<Inner>>, generation: u64, deadline: Instant) {
    sleep_until(deadline).await;

    let Some(shared) = engine.upgrade() else {
        return;
    };
    let mut inner = lock(&shared);
    if inner.auto_start_generation != generation {
        return;
    }

    // Detach our own handle before starting so start() does not abort us.
    inner.auto_start = None;
    debug!("auto-start firing");
    start_locked(&mut inner, &shared);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine() -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        create_engine_with_config(PomodoroConfig::default())
    }

    fn create_engine_with_config(
        config: PomodoroConfig,
    ) -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(config, tx).unwrap();
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Advances the paused clock one second at a time.
    async fn tick_seconds(n: u32) {
        for _ in 0..n {
            tokio::time::advance(TICK_INTERVAL).await;
            settle().await;
        }
    }

    // ------------------------------------------------------------------------
    // TimerEvent Tests
    // ------------------------------------------------------------------------

    mod timer_event_tests {
        use super::*;

        #[test]
        fn test_period_completed_event() {
            let event = TimerEvent::PeriodCompleted(PeriodCompleted {
                previous_mode: Mode::Work,
                next_mode: Mode::LongBreak,
                is_long_break: true,
            });
            assert_eq!(event.clone(), event);
        }

        #[test]
        fn test_event_debug() {
            let event = TimerEvent::Tick {
                remaining_seconds: 5,
            };
            assert_eq!(format!("{:?}", event), "Tick { remaining_seconds: 5 }");
        }
    }

    // ------------------------------------------------------------------------
    // Synchronous Operation Tests
    // ------------------------------------------------------------------------

    mod operation_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let (engine, _rx) = create_engine();

            assert_eq!(engine.mode(), Mode::Work);
            assert_eq!(engine.time_remaining_seconds(), 1500);
            assert_eq!(engine.total_time_seconds(), 1500);
            assert!(!engine.is_running());
            assert_eq!(engine.completed_work_sessions(), 0);
            assert!(!engine.is_auto_start_pending());
        }

        #[test]
        fn test_new_rejects_invalid_config() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let config = PomodoroConfig::default().with_long_break(2);
            let result = TimerEngine::new(config, tx);
            assert_eq!(result.unwrap_err(), ConfigError::LongBreak(2));
        }

        #[test]
        fn test_pause_when_idle_is_noop() {
            let (engine, mut rx) = create_engine();

            engine.pause();
            engine.pause();

            assert!(!engine.is_running());
            assert_eq!(engine.time_remaining_seconds(), 1500);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_reset_emits_event() {
            let (engine, mut rx) = create_engine();

            engine.reset();

            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::Reset {
                    mode: Mode::Work,
                    remaining_seconds: 1500
                }]
            );
        }

        #[test]
        fn test_skip_work_without_auto_start() {
            let (engine, mut rx) = create_engine();

            engine.skip();

            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert_eq!(engine.time_remaining_seconds(), 300);
            assert_eq!(engine.completed_work_sessions(), 1);
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::PeriodCompleted(PeriodCompleted {
                    previous_mode: Mode::Work,
                    next_mode: Mode::ShortBreak,
                    is_long_break: false,
                })]
            );
        }

        #[test]
        fn test_scenario_long_break_on_fourth_session() {
            let (engine, _rx) = create_engine();

            engine.skip();
            assert_eq!(engine.completed_work_sessions(), 1);
            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert_eq!(engine.time_remaining_seconds(), 300);

            for _ in 0..3 {
                engine.skip(); // break -> work
                engine.skip(); // work -> break
            }

            assert_eq!(engine.completed_work_sessions(), 4);
            assert_eq!(engine.mode(), Mode::LongBreak);
            assert_eq!(engine.time_remaining_seconds(), 900);
        }

        #[test]
        fn test_long_break_cycle_property() {
            for threshold in 2..=10 {
                let config = PomodoroConfig::default().with_sessions_before_long_break(threshold);
                let (engine, _rx) = create_engine_with_config(config);

                for cycle in 1..=25u32 {
                    engine.skip();
                    let expected = if cycle % threshold == 0 {
                        Mode::LongBreak
                    } else {
                        Mode::ShortBreak
                    };
                    assert_eq!(engine.mode(), expected, "threshold {threshold}, cycle {cycle}");
                    engine.skip();
                    assert_eq!(engine.mode(), Mode::Work);
                }
            }
        }

        #[test]
        fn test_reset_in_break_keeps_break_length() {
            let (engine, _rx) = create_engine();
            for _ in 0..3 {
                engine.skip();
                engine.skip();
            }
            engine.skip();
            assert_eq!(engine.mode(), Mode::LongBreak);

            engine.reset();
            engine.reset();

            assert_eq!(engine.mode(), Mode::LongBreak);
            assert_eq!(engine.time_remaining_seconds(), 900);
            assert_eq!(engine.completed_work_sessions(), 4);
        }

        #[test]
        fn test_update_configuration_resizes_idle_period() {
            let (engine, _rx) = create_engine();

            engine
                .update_configuration(PomodoroConfig::default().with_work_duration(50))
                .unwrap();

            assert_eq!(engine.total_time_seconds(), 3000);
            assert_eq!(engine.time_remaining_seconds(), 3000);
            assert_eq!(engine.config().work_duration, 50);
        }

        #[test]
        fn test_update_configuration_rejects_invalid() {
            let (engine, _rx) = create_engine();

            let result =
                engine.update_configuration(PomodoroConfig::default().with_short_break(45));

            assert_eq!(result, Err(ConfigError::ShortBreak(45)));
            assert_eq!(engine.config(), PomodoroConfig::default());
            assert_eq!(engine.total_time_seconds(), 1500);
        }

        #[test]
        fn test_update_configuration_applies_on_next_mode_entry() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let config = PomodoroConfig::default();
            let mut state = TimerState::new(&config);
            state.time_remaining_seconds = 700;
            let engine = TimerEngine::restore(config, state, tx).unwrap();

            engine
                .update_configuration(PomodoroConfig::default().with_short_break(10))
                .unwrap();
            assert_eq!(engine.time_remaining_seconds(), 700);
            assert_eq!(engine.total_time_seconds(), 1500);

            engine.skip();
            assert_eq!(engine.time_remaining_seconds(), 600);
        }

        #[test]
        fn test_restore_clamps_and_clears_running() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let state = TimerState {
                mode: Mode::ShortBreak,
                time_remaining_seconds: 9999,
                total_time_seconds: 300,
                is_running: true,
                completed_work_sessions: 2,
            };

            let engine = TimerEngine::restore(PomodoroConfig::default(), state, tx).unwrap();
            let snapshot = engine.snapshot();

            assert!(!snapshot.is_running);
            assert_eq!(snapshot.time_remaining_seconds, 300);
            assert_eq!(snapshot.completed_work_sessions, 2);
            assert_eq!(snapshot.mode, Mode::ShortBreak);
        }

        #[test]
        fn test_restore_fills_missing_total() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let state = TimerState {
                mode: Mode::LongBreak,
                time_remaining_seconds: 0,
                total_time_seconds: 0,
                is_running: false,
                completed_work_sessions: 4,
            };

            let engine = TimerEngine::restore(PomodoroConfig::default(), state, tx).unwrap();
            assert_eq!(engine.total_time_seconds(), 900);
            assert_eq!(engine.time_remaining_seconds(), 900);
        }
    }

    // ------------------------------------------------------------------------
    // Countdown Driver Tests (paused clock)
    // ------------------------------------------------------------------------

    mod driver_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_start_emits_started_and_ticks() {
            let (engine, mut rx) = create_engine();

            engine.start();
            assert!(engine.is_running());
            tick_seconds(3).await;

            assert_eq!(engine.time_remaining_seconds(), 1497);
            assert_eq!(
                drain(&mut rx),
                vec![
                    TimerEvent::Started { mode: Mode::Work },
                    TimerEvent::Tick {
                        remaining_seconds: 1499
                    },
                    TimerEvent::Tick {
                        remaining_seconds: 1498
                    },
                    TimerEvent::Tick {
                        remaining_seconds: 1497
                    },
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_twice_is_idempotent() {
            let (engine, mut rx) = create_engine();

            engine.start();
            let before = engine.snapshot();
            engine.start();

            assert_eq!(engine.snapshot(), before);
            tick_seconds(2).await;

            // A second driver would double the decrement.
            assert_eq!(engine.time_remaining_seconds(), 1498);
            let started = drain(&mut rx)
                .into_iter()
                .filter(|e| matches!(e, TimerEvent::Started { .. }))
                .count();
            assert_eq!(started, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_then_start_resumes_exactly() {
            let (engine, _rx) = create_engine();

            engine.start();
            tick_seconds(10).await;
            engine.pause();
            assert_eq!(engine.time_remaining_seconds(), 1490);

            tick_seconds(5).await;
            assert_eq!(engine.time_remaining_seconds(), 1490);
            assert!(!engine.is_running());

            engine.pause();
            assert_eq!(engine.time_remaining_seconds(), 1490);

            engine.start();
            tick_seconds(3).await;
            assert_eq!(engine.time_remaining_seconds(), 1487);
        }

        #[tokio::test(start_paused = true)]
        async fn test_full_work_period_completes_once() {
            let config = PomodoroConfig::default().with_work_duration(1);
            let (engine, mut rx) = create_engine_with_config(config);

            engine.start();
            tick_seconds(60).await;

            let completions: Vec<_> = drain(&mut rx)
                .into_iter()
                .filter_map(|e| match e {
                    TimerEvent::PeriodCompleted(c) => Some(c),
                    _ => None,
                })
                .collect();

            assert_eq!(
                completions,
                vec![PeriodCompleted {
                    previous_mode: Mode::Work,
                    next_mode: Mode::ShortBreak,
                    is_long_break: false,
                }]
            );
            assert_eq!(engine.completed_work_sessions(), 1);
            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert!(!engine.is_running());

            // The driver is gone: nothing moves any more.
            tick_seconds(5).await;
            assert_eq!(engine.time_remaining_seconds(), 300);
            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn test_skip_matches_natural_completion() {
            let config = PomodoroConfig::default().with_work_duration(1);

            let (natural, mut natural_rx) = create_engine_with_config(config.clone());
            natural.start();
            tick_seconds(60).await;

            let (skipped, mut skipped_rx) = create_engine_with_config(config);
            skipped.start();
            skipped.skip();

            assert_eq!(natural.snapshot(), skipped.snapshot());

            let last_completed = |events: Vec<TimerEvent>| {
                events
                    .into_iter()
                    .rev()
                    .find(|e| matches!(e, TimerEvent::PeriodCompleted(_)))
            };
            assert_eq!(
                last_completed(drain(&mut natural_rx)),
                last_completed(drain(&mut skipped_rx))
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_reset_while_running_stops_driver() {
            let (engine, _rx) = create_engine();

            engine.start();
            tick_seconds(30).await;
            engine.reset();

            assert!(!engine.is_running());
            assert_eq!(engine.time_remaining_seconds(), 1500);

            tick_seconds(3).await;
            assert_eq!(engine.time_remaining_seconds(), 1500);
        }

        #[tokio::test(start_paused = true)]
        async fn test_auto_start_break_after_delay() {
            let config = PomodoroConfig {
                work_duration: 1,
                auto_start_breaks: true,
                ..PomodoroConfig::default()
            };
            let (engine, mut rx) = create_engine_with_config(config);

            engine.start();
            tick_seconds(60).await;

            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert!(!engine.is_running());
            assert!(engine.is_auto_start_pending());
            drain(&mut rx);

            tick_seconds(1).await;
            assert!(!engine.is_running());

            tick_seconds(1).await;
            assert!(engine.is_running());
            assert!(!engine.is_auto_start_pending());
            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert_eq!(engine.completed_work_sessions(), 1);

            let events = drain(&mut rx);
            assert_eq!(
                events,
                vec![TimerEvent::Started {
                    mode: Mode::ShortBreak
                }]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_auto_start_pomodoro_after_break() {
            let config = PomodoroConfig {
                short_break: 1,
                auto_start_pomodoros: true,
                ..PomodoroConfig::default()
            };
            let (engine, _rx) = create_engine_with_config(config);

            engine.skip();
            assert!(!engine.is_auto_start_pending());

            engine.start();
            tick_seconds(60).await;
            assert_eq!(engine.mode(), Mode::Work);
            assert!(engine.is_auto_start_pending());

            tick_seconds(2).await;
            assert!(engine.is_running());
            assert_eq!(engine.mode(), Mode::Work);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_cancels_pending_auto_start() {
            let config = PomodoroConfig {
                auto_start_breaks: true,
                ..PomodoroConfig::default()
            };
            let (engine, _rx) = create_engine_with_config(config);

            engine.skip();
            assert!(engine.is_auto_start_pending());

            engine.pause();
            assert!(!engine.is_auto_start_pending());

            tick_seconds(3).await;
            assert!(!engine.is_running());
            assert_eq!(engine.time_remaining_seconds(), 300);
        }

        #[tokio::test(start_paused = true)]
        async fn test_manual_start_during_pending_auto_start() {
            let config = PomodoroConfig {
                auto_start_breaks: true,
                ..PomodoroConfig::default()
            };
            let (engine, mut rx) = create_engine_with_config(config);

            engine.skip();
            engine.start();
            tick_seconds(3).await;

            assert!(engine.is_running());
            assert_eq!(engine.time_remaining_seconds(), 297);
            let started = drain(&mut rx)
                .into_iter()
                .filter(|e| matches!(e, TimerEvent::Started { .. }))
                .count();
            assert_eq!(started, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_skip_replaces_pending_auto_start() {
            let config = PomodoroConfig {
                auto_start_breaks: true,
                ..PomodoroConfig::default()
            };
            let (engine, _rx) = create_engine_with_config(config);

            engine.skip(); // work -> short break, auto-start pending
            engine.skip(); // short break -> work, no auto-start for work
            assert!(!engine.is_auto_start_pending());

            tick_seconds(3).await;
            assert!(!engine.is_running());
            assert_eq!(engine.mode(), Mode::Work);
        }

        #[tokio::test(start_paused = true)]
        async fn test_shutdown_cancels_everything() {
            let config = PomodoroConfig {
                auto_start_breaks: true,
                ..PomodoroConfig::default()
            };
            let (engine, mut rx) = create_engine_with_config(config);

            engine.skip();
            engine.shutdown();
            assert!(!engine.is_auto_start_pending());
            drain(&mut rx);

            tick_seconds(3).await;
            assert!(!engine.is_running());

            engine.start();
            engine.skip();
            assert!(!engine.is_running());
            assert_eq!(engine.mode(), Mode::ShortBreak);
            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn test_drop_cancels_driver() {
            let (engine, mut rx) = create_engine();

            engine.start();
            tick_seconds(1).await;
            drop(engine);
            settle().await;
            drain(&mut rx);

            tick_seconds(3).await;
            assert!(matches!(
                rx.try_recv(),
                Err(mpsc::error::TryRecvError::Disconnected)
            ));
        }
    }
}
