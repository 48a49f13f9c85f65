//! Tick scheduler: advances simulated time at a fixed nominal cadence.
//!
//! State machine: Stopped → Running → Stopped.
//!
//! RULES:
//!   - Elapsed time per tick is the measured delta since the previous
//!     tick, not the nominal interval, so jitter and suspensions are
//!     credited exactly.
//!   - Time spent Stopped is never credited; `start` resets the baseline.
//!   - A tick is applied whole or not at all. `stop` takes effect before
//!     the next poll.
//!   - Nothing here is persisted. Loading a save never credits offline time.

use crate::{
    error::SimResult,
    event::SimEvent,
    session::Session,
    types::Tick,
};
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval:     Duration,
    state:        SchedulerState,
    last_tick_at: Duration,
    ticks_issued: Tick,
}

impl Default for TickScheduler {
    fn default() -> Self { Self::new(DEFAULT_TICK_INTERVAL) }
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be positive");
        Self {
            interval,
            state: SchedulerState::Stopped,
            last_tick_at: Duration::ZERO,
            ticks_issued: 0,
        }
    }

    pub fn state(&self) -> SchedulerState { self.state }
    pub fn is_running(&self) -> bool { self.state == SchedulerState::Running }
    pub fn interval(&self) -> Duration { self.interval }
    pub fn ticks_issued(&self) -> Tick { self.ticks_issued }

    /// Stopped → Running. Returns false (and changes nothing) if already running.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SchedulerState::Running;
        self.last_tick_at = now;
        log::debug!("scheduler started at {now:?}");
        true
    }

    /// Running → Stopped. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SchedulerState::Stopped;
        log::debug!("scheduler stopped after {} ticks", self.ticks_issued);
        true
    }

    /// When the next tick is due, if running.
    pub fn next_due(&self) -> Option<Duration> {
        self.is_running().then(|| self.last_tick_at + self.interval)
    }

    /// Fire one tick if one is due at `now`. Returns `None` when stopped
    /// or not yet due.
    pub fn poll(&mut self, now: Duration, session: &mut Session) -> SimResult<Option<Vec<SimEvent>>> {
        match self.next_due() {
            Some(due) if now >= due => {}
            _ => return Ok(None),
        }
        let elapsed = now.saturating_sub(self.last_tick_at);
        let events = self.tick(session, elapsed)?;
        self.last_tick_at = now;
        Ok(Some(events))
    }

    /// Apply one tick of `elapsed` simulated time, regardless of state.
    /// Simulated-clock drivers and tests call this directly.
    pub fn tick(&mut self, session: &mut Session, elapsed: Duration) -> SimResult<Vec<SimEvent>> {
        let events = session.tick(elapsed.as_secs_f64())?;
        self.ticks_issued += 1;
        Ok(events)
    }
}
