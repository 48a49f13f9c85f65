//! Time sources: the only place wall-clock time enters the simulation.
//!
//! `WallClock` drives production hosts. `ManualClock` drives tests and
//! headless runs with virtual time, optionally with scheduling jitter.

use std::time::{Duration, Instant};

pub trait TimeSource {
    /// Monotonic time since the source was created.
    fn now(&self) -> Duration;

    /// Yield until roughly `duration` has passed.
    fn sleep(&mut self, duration: Duration);
}

pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self { Self::new() }
}

impl TimeSource for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time. `sleep` advances instantly; each sleep overshoots by the
/// next entry of the jitter pattern (cycled), if one is set.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now:    Duration,
    jitter: Vec<Duration>,
    sleeps: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jitter(jitter: Vec<Duration>) -> Self {
        Self { jitter, ..Self::default() }
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        let extra = if self.jitter.is_empty() {
            Duration::ZERO
        } else {
            self.jitter[self.sleeps % self.jitter.len()]
        };
        self.sleeps += 1;
        self.now += duration + extra;
    }
}
