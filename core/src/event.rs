//! Events emitted by every mutation.
//!
//! The presentation layer consumes these as notifications; the engine
//! appends them to the persisted event log.
//! Variants are added over time: never removed or reordered.

use crate::{
    ledger::Cost,
    types::{AchievementId, EntryId, SessionId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Manual actions ─────────────────────────────
    CoinsCollected {
        amount: f64,
    },
    PopulationAttracted {
        amount: f64,
    },

    // ── Economy ────────────────────────────────────
    EntryPurchased {
        entry:     EntryId,
        cost:      Cost,
        new_count: u32,
    },
    TickCredited {
        tick:            Tick,
        elapsed_seconds: f64,
        credited:        Cost,
    },

    // ── Achievements ───────────────────────────────
    AchievementUnlocked {
        achievement: AchievementId,
        label:       String,
        reward:      Cost,
    },

    // ── Session lifecycle ──────────────────────────
    SessionSaved {
        session_id: SessionId,
    },
    SessionLoaded {
        session_id: SessionId,
    },
    SchedulerStarted,
    SchedulerStopped,
}

impl SimEvent {
    /// Stable name used for the event_type column in the event log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CoinsCollected { .. }      => "coins_collected",
            Self::PopulationAttracted { .. } => "population_attracted",
            Self::EntryPurchased { .. }      => "entry_purchased",
            Self::TickCredited { .. }        => "tick_credited",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
            Self::SessionSaved { .. }        => "session_saved",
            Self::SessionLoaded { .. }       => "session_loaded",
            Self::SchedulerStarted           => "scheduler_started",
            Self::SchedulerStopped           => "scheduler_stopped",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub session_id: SessionId,
    pub tick:       Tick,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
