//! The game engine: hosting shell around one session.
//!
//! Owns exactly one Session, one TickScheduler and one SaveStore.
//!
//! RULES:
//!   - Every entry point forwards to the session; the engine adds no
//!     game logic of its own.
//!   - Every event a session produces is appended to the event log.
//!   - Autosave runs every `autosave_every_ticks` ticks.
//!   - Loading never credits time that passed since the save.

use crate::{
    autoplay::AutoPlayer,
    clock::TimeSource,
    config::GameConfig,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    scheduler::TickScheduler,
    session::Session,
    snapshot::Snapshot,
    store::SaveStore,
    types::Tick,
};
use std::time::Duration;

pub const DEFAULT_SLOT: &str = "main";

pub struct GameEngine {
    pub session:   Session,
    pub scheduler: TickScheduler,
    store:         SaveStore,
    slot:          String,
    autosave_every_ticks: Tick,
}

impl GameEngine {
    pub fn new(session: Session, scheduler: TickScheduler, store: SaveStore) -> Self {
        Self {
            session,
            scheduler,
            store,
            slot: DEFAULT_SLOT.to_string(),
            autosave_every_ticks: 0,
        }
    }

    /// Build a fully wired engine from configuration.
    /// Call this instead of new() + manual setup.
    pub fn build(config: &GameConfig, store: SaveStore) -> SimResult<Self> {
        config.settings.validate().map_err(SimError::invalid_content)?;
        store.migrate()?;
        let session = Session::new(config.content.clone());
        let scheduler = TickScheduler::new(Duration::from_millis(config.settings.tick_interval_ms));
        let mut engine = GameEngine::new(session, scheduler, store);
        engine.autosave_every_ticks = config.settings.autosave_every_ticks;
        log::info!("engine built for session {}", engine.session.id());
        Ok(engine)
    }

    /// In-memory store and built-in content. Used by tests.
    pub fn build_test() -> SimResult<Self> {
        Self::build(&GameConfig::default_test(), SaveStore::in_memory()?)
    }

    pub fn with_slot(mut self, slot: &str) -> Self {
        self.slot = slot.to_string();
        self
    }

    // ── Player actions ─────────────────────────────

    pub fn collect_coins(&mut self, amount: f64) -> SimResult<Vec<SimEvent>> {
        let events = self.session.collect_coins(amount)?;
        self.record(&events)?;
        Ok(events)
    }

    pub fn attract_population(&mut self, amount: f64) -> SimResult<Vec<SimEvent>> {
        let events = self.session.attract_population(amount)?;
        self.record(&events)?;
        Ok(events)
    }

    pub fn purchase(&mut self, entry_id: &str) -> SimResult<Vec<SimEvent>> {
        let events = self.session.purchase(entry_id)?;
        self.record(&events)?;
        Ok(events)
    }

    /// Let the headless player act once; its events are logged like any other.
    pub fn play_turn(&mut self, player: &mut AutoPlayer) -> SimResult<Vec<SimEvent>> {
        let events = player.take_turn(&mut self.session)?;
        self.record(&events)?;
        Ok(events)
    }

    // ── Time ───────────────────────────────────────

    pub fn start(&mut self, now: Duration) -> SimResult<Vec<SimEvent>> {
        let events = if self.scheduler.start(now) {
            vec![SimEvent::SchedulerStarted]
        } else {
            vec![]
        };
        self.record(&events)?;
        Ok(events)
    }

    pub fn stop(&mut self) -> SimResult<Vec<SimEvent>> {
        let events = if self.scheduler.stop() {
            vec![SimEvent::SchedulerStopped]
        } else {
            vec![]
        };
        self.record(&events)?;
        Ok(events)
    }

    /// Fire the scheduler if a tick is due at `now`.
    pub fn poll(&mut self, now: Duration) -> SimResult<Vec<SimEvent>> {
        match self.scheduler.poll(now, &mut self.session)? {
            Some(events) => self.after_tick(events),
            None => Ok(vec![]),
        }
    }

    /// Apply one tick of explicit elapsed time (simulated-clock hosts).
    pub fn advance(&mut self, elapsed: Duration) -> SimResult<Vec<SimEvent>> {
        let events = self.scheduler.tick(&mut self.session, elapsed)?;
        self.after_tick(events)
    }

    /// Start if needed, then drive `ticks` ticks from `time`.
    pub fn run_ticks(&mut self, time: &mut dyn TimeSource, ticks: u64) -> SimResult<Vec<SimEvent>> {
        let mut events = self.start(time.now())?;
        let mut fired = 0;
        while fired < ticks && self.scheduler.is_running() {
            if let Some(due) = self.scheduler.next_due() {
                let now = time.now();
                if now < due {
                    time.sleep(due - now);
                }
            }
            let tick_events = self.poll(time.now())?;
            if !tick_events.is_empty() {
                fired += 1;
                events.extend(tick_events);
            }
        }
        Ok(events)
    }

    fn after_tick(&mut self, events: Vec<SimEvent>) -> SimResult<Vec<SimEvent>> {
        self.record(&events)?;
        let tick = self.session.statistics().ticks;
        if self.autosave_every_ticks > 0 && tick.is_multiple_of(self.autosave_every_ticks) {
            self.save()?;
            log::debug!("autosaved at tick {tick}");
        }
        Ok(events)
    }

    // ── Persistence ────────────────────────────────

    pub fn save(&mut self) -> SimResult<Snapshot> {
        let snapshot = self.session.save();
        self.store.save_snapshot(&self.slot, &snapshot)?;
        self.record(&[SimEvent::SessionSaved { session_id: snapshot.session_id.clone() }])?;
        log::info!("session {} saved to slot '{}'", snapshot.session_id, self.slot);
        Ok(snapshot)
    }

    /// Replace the session with `snapshot`. The current state survives a
    /// malformed snapshot untouched.
    pub fn load(&mut self, snapshot: &Snapshot) -> SimResult<Vec<SimEvent>> {
        let events = self.session.load(snapshot)?;
        self.record(&events)?;
        Ok(events)
    }

    /// Restore the most recent save in this engine's slot.
    /// Returns `None` when the slot is empty.
    pub fn load_latest(&mut self) -> SimResult<Option<Vec<SimEvent>>> {
        match self.store.latest_snapshot(&self.slot)? {
            Some(snapshot) => self.load(&snapshot).map(Some),
            None => Ok(None),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    fn record(&self, events: &[SimEvent]) -> SimResult<()> {
        let tick = self.session.statistics().ticks;
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                session_id: self.session.id().to_string(),
                tick,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
        }
        Ok(())
    }
}
