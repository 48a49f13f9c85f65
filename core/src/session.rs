//! The session: the single mutation path over simulation state.
//!
//! RULES:
//!   - Ledger, ownership, statistics and the unlocked set are only
//!     written through the entry points below.
//!   - Every entry point runs achievement evaluation before returning.
//!   - Rejected actions leave state exactly as it was.

use crate::{
    achievement::{self, AchievementBook, UnlockedSet},
    catalog::Catalog,
    config::GameContent,
    economy::{self, Rates},
    error::{SimError, SimResult},
    event::SimEvent,
    ledger::{Cost, Ledger},
    ownership::Ownership,
    snapshot::Snapshot,
    stats::Statistics,
    types::{Resource, SessionId},
};
use std::sync::Arc;

/// Everything that is saved and restored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub ledger:     Ledger,
    pub ownership:  Ownership,
    pub unlocked:   UnlockedSet,
    pub statistics: Statistics,
}

pub struct Session {
    id:      SessionId,
    content: Arc<GameContent>,
    state:   SessionState,
}

impl Session {
    pub fn new(content: Arc<GameContent>) -> Self {
        Self::with_state(content, SessionState::default())
    }

    pub fn with_state(content: Arc<GameContent>, state: SessionState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            state,
        }
    }

    // ── Read accessors ─────────────────────────────

    pub fn id(&self) -> &str { &self.id }
    pub fn state(&self) -> &SessionState { &self.state }
    pub fn ledger(&self) -> &Ledger { &self.state.ledger }
    pub fn ownership(&self) -> &Ownership { &self.state.ownership }
    pub fn unlocked(&self) -> &UnlockedSet { &self.state.unlocked }
    pub fn statistics(&self) -> &Statistics { &self.state.statistics }
    pub fn content(&self) -> &Arc<GameContent> { &self.content }
    pub fn catalog(&self) -> &Catalog { &self.content.catalog }
    pub fn achievements(&self) -> &AchievementBook { &self.content.achievements }

    pub fn rate_of(&self, resource: Resource) -> f64 {
        economy::rate_of(resource, &self.state.ownership, self.catalog())
    }

    pub fn rates(&self) -> Rates {
        economy::rates(&self.state.ownership, self.catalog())
    }

    pub fn cost_of(&self, entry_id: &str) -> SimResult<Cost> {
        economy::cost_of(entry_id, &self.state.ownership, self.catalog())
    }

    /// Whether `entry_id` could be bought right now, without buying it.
    pub fn can_purchase(&self, entry_id: &str) -> bool {
        economy::check_purchase(entry_id, &self.state.ledger, &self.state.ownership, self.catalog())
            .is_ok()
    }

    // ── Write entry points ─────────────────────────

    pub fn collect_coins(&mut self, amount: f64) -> SimResult<Vec<SimEvent>> {
        validate_amount("collect_coins", amount)?;
        let applied = self.manual_credit(Resource::Coins, amount);
        Ok(self.finish(vec![SimEvent::CoinsCollected { amount: applied }]))
    }

    pub fn attract_population(&mut self, amount: f64) -> SimResult<Vec<SimEvent>> {
        validate_amount("attract_population", amount)?;
        let applied = self.manual_credit(Resource::Population, amount);
        Ok(self.finish(vec![SimEvent::PopulationAttracted { amount: applied }]))
    }

    pub fn purchase(&mut self, entry_id: &str) -> SimResult<Vec<SimEvent>> {
        let receipt = economy::purchase(
            entry_id,
            &mut self.state.ledger,
            &mut self.state.ownership,
            &mut self.state.statistics,
            &self.content.catalog,
        )?;
        Ok(self.finish(vec![SimEvent::EntryPurchased {
            entry:     receipt.entry,
            cost:      receipt.cost,
            new_count: receipt.new_count,
        }]))
    }

    /// Advance simulated time by `elapsed_seconds` and credit generation.
    pub fn tick(&mut self, elapsed_seconds: f64) -> SimResult<Vec<SimEvent>> {
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(SimError::InvalidAmount { action: "tick", amount: elapsed_seconds });
        }
        let credited = economy::credit_tick(
            &mut self.state.ledger,
            &self.state.ownership,
            &mut self.state.statistics,
            &self.content.catalog,
            elapsed_seconds,
        );
        self.state.statistics.ticks += 1;
        let tick = self.state.statistics.ticks;

        log::debug!("tick={tick} elapsed={elapsed_seconds:.3}s credited={credited:?}");

        Ok(self.finish(vec![SimEvent::TickCredited { tick, elapsed_seconds, credited }]))
    }

    /// Freeze the full simulation state.
    pub fn save(&self) -> Snapshot {
        Snapshot::capture(self, chrono::Utc::now())
    }

    /// Replace the whole state with a snapshot's. A malformed snapshot is
    /// refused and the current state is kept.
    pub fn load(&mut self, snapshot: &Snapshot) -> SimResult<Vec<SimEvent>> {
        let state = match snapshot.restore(&self.content) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("refusing snapshot {}: {err}", snapshot.session_id);
                return Err(err);
            }
        };
        self.id = snapshot.session_id.clone();
        self.state = state;
        log::info!("session {} loaded (saved at {})", self.id, snapshot.saved_at);
        Ok(vec![SimEvent::SessionLoaded { session_id: self.id.clone() }])
    }

    /// Start over: fresh ledger, nothing owned, statistics and unlocks cleared.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        log::info!("session {} reset", self.id);
    }

    fn manual_credit(&mut self, resource: Resource, amount: f64) -> f64 {
        let applied = self.state.ledger.credit(resource, amount);
        self.state.statistics.clicks += 1;
        self.state.statistics.earned.add(resource, applied);
        applied
    }

    fn finish(&mut self, mut events: Vec<SimEvent>) -> Vec<SimEvent> {
        let state = &mut self.state;
        events.extend(achievement::evaluate(
            &self.content.achievements,
            &mut state.ledger,
            &state.ownership,
            &state.statistics,
            &mut state.unlocked,
        ));
        events
    }
}

fn validate_amount(action: &'static str, amount: f64) -> SimResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidAmount { action, amount })
    }
}
