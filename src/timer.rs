#![allow(dead_code)]
//! Drift-corrected countdown timer
//!
//! The timer keeps a wall-clock deadline while running and derives the
//! remaining whole seconds from it on every poll, so missed polls or a
//! suspended process never make it drift. Lifecycle events go out over
//! channels handed out by [`Countdown::subscribe`]; the game engine keeps
//! one and treats `End` as the turn running out.
//!
//! ```text
//! Paused ──start/restart──▶ Active ──poll hits 0 / stop──▶ Ended
//!   ▲                        │  ▲                           │
//!   └────────pause───────────┘  └──────resume (from pause)  │
//!   ▲                                                       │
//!   └─────────────reset──────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Start value when none is configured
pub const DEFAULT_START_SECONDS: u32 = 120;

/// Default polling interval
pub const DEFAULT_RESOLUTION_MS: u64 = 250;

/// Polling is never finer than this
pub const MIN_RESOLUTION_MS: u64 = 50;

/// Source of wall-clock time in milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to (for tests and replays)
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Externally visible timer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Active,
    Paused,
    Ended,
}

/// Lifecycle notifications, carrying remaining seconds where relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start(u32),
    Tick(u32),
    Pause(u32),
    Resume(u32),
    /// Seconds that were left when stopped
    Stop(u32),
    Reset,
    Restart(u32),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Configured but not started
    Ready,
    Running { deadline_ms: u64 },
    /// Explicitly paused
    Held,
    Ended,
}

/// Restartable, pausable countdown in whole seconds
pub struct Countdown {
    clock: Box<dyn Clock>,
    phase: Phase,
    remaining: u32,
    start_seconds: u32,
    resolution: Duration,
    /// Bumped on every start so a cycle is identifiable
    cycle: u64,
    listeners: Vec<Sender<TimerEvent>>,
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("phase", &self.phase)
            .field("remaining", &self.remaining)
            .field("start_seconds", &self.start_seconds)
            .field("cycle", &self.cycle)
            .finish()
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_START_SECONDS, Box::new(SystemClock))
    }
}

impl Countdown {
    /// A paused timer holding `start_seconds` (ended if that is zero)
    pub fn new(start_seconds: u32, clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            phase: if start_seconds == 0 {
                Phase::Ended
            } else {
                Phase::Ready
            },
            remaining: start_seconds,
            start_seconds,
            resolution: Duration::from_millis(DEFAULT_RESOLUTION_MS),
            cycle: 0,
            listeners: Vec::new(),
        }
    }

    /// Set the polling interval, clamped to [`MIN_RESOLUTION_MS`]
    pub fn with_resolution(mut self, ms: u64) -> Self {
        self.set_resolution(ms);
        self
    }

    pub fn set_resolution(&mut self, ms: u64) {
        self.resolution = Duration::from_millis(ms.max(MIN_RESOLUTION_MS));
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&mut self) -> Receiver<TimerEvent> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    pub fn status(&self) -> TimerStatus {
        match self.phase {
            Phase::Running { .. } => TimerStatus::Active,
            Phase::Ready | Phase::Held => TimerStatus::Paused,
            Phase::Ended => TimerStatus::Ended,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == TimerStatus::Active
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn start_seconds(&self) -> u32 {
        self.start_seconds
    }

    /// Deadline in epoch milliseconds, set only while active
    pub fn deadline_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Running { deadline_ms } => Some(deadline_ms),
            _ => None,
        }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// How often [`Countdown::poll`] should be called
    pub fn poll_interval(&self) -> Duration {
        self.resolution
    }

    /// Remaining time as `m:ss`
    pub fn formatted(&self) -> String {
        format_time(self.remaining)
    }

    /// Start counting down from `seconds`, or the configured start value.
    pub fn start(&mut self, seconds: Option<u32>) {
        let initial = seconds.unwrap_or(self.start_seconds);
        self.begin(initial);
    }

    /// Freeze the remaining seconds. Does nothing unless active.
    pub fn pause(&mut self) {
        if !matches!(self.phase, Phase::Running { .. }) {
            return;
        }
        self.phase = Phase::Held;
        debug!(remaining = self.remaining, "timer paused");
        self.emit(TimerEvent::Pause(self.remaining));
    }

    /// Continue after a pause. Does nothing unless paused with time left.
    pub fn resume(&mut self) {
        if self.phase != Phase::Held || self.remaining == 0 {
            return;
        }
        let deadline_ms = self.deadline_from_now(self.remaining);
        self.phase = Phase::Running { deadline_ms };
        debug!(remaining = self.remaining, "timer resumed");
        self.emit(TimerEvent::Resume(self.remaining));
    }

    /// Force the timer to zero. Does nothing unless running or paused.
    pub fn stop(&mut self) {
        if !matches!(self.phase, Phase::Running { .. } | Phase::Held) {
            return;
        }
        let at = self.remaining;
        self.phase = Phase::Ended;
        self.remaining = 0;
        debug!(at, "timer stopped");
        self.emit(TimerEvent::Stop(at));
    }

    /// Go back to a paused timer holding `seconds` without starting it.
    pub fn reset(&mut self, seconds: Option<u32>) {
        let initial = seconds.unwrap_or(self.start_seconds);
        self.start_seconds = initial;
        self.remaining = initial;
        self.phase = if initial == 0 {
            Phase::Ended
        } else {
            Phase::Ready
        };
        debug!(initial, "timer reset");
        self.emit(TimerEvent::Reset);
    }

    /// Reset to `seconds` and start straight away.
    pub fn restart(&mut self, seconds: Option<u32>) {
        let initial = seconds.unwrap_or(self.start_seconds);
        self.start_seconds = initial;
        self.emit(TimerEvent::Restart(initial));
        self.begin(initial);
    }

    /// Recompute remaining seconds from the deadline.
    ///
    /// Emits a tick only when the whole-second value changes. Returns true
    /// exactly once per cycle: on the poll that reaches zero.
    pub fn poll(&mut self) -> bool {
        let Phase::Running { deadline_ms } = self.phase else {
            return false;
        };
        let left_ms = deadline_ms.saturating_sub(self.clock.now_ms());
        let seconds = left_ms.div_ceil(1000) as u32;
        if seconds == self.remaining {
            return false;
        }

        self.remaining = seconds;
        self.emit(TimerEvent::Tick(seconds));
        if seconds == 0 {
            self.phase = Phase::Ended;
            info!(cycle = self.cycle, "timer ran out");
            self.emit(TimerEvent::End);
            return true;
        }
        false
    }

    fn begin(&mut self, initial: u32) {
        self.cycle += 1;
        self.remaining = initial;
        debug!(initial, cycle = self.cycle, "timer started");

        if initial == 0 {
            self.phase = Phase::Ended;
            self.emit(TimerEvent::Start(0));
            self.emit(TimerEvent::Tick(0));
            self.emit(TimerEvent::End);
            return;
        }

        let deadline_ms = self.deadline_from_now(initial);
        self.phase = Phase::Running { deadline_ms };
        self.emit(TimerEvent::Start(initial));
        self.emit(TimerEvent::Tick(initial));
    }

    fn deadline_from_now(&self, seconds: u32) -> u64 {
        self.clock.now_ms() + u64::from(seconds) * 1000
    }

    fn emit(&mut self, event: TimerEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
