//! Snapshot codec: full session state to/from a persistable value.
//!
//! `capture` never fails. `restore` validates everything against the
//! game content before producing a state; it never merges, the caller
//! replaces its whole state with the result.
//!
//! Round-trip law: restore(capture(s)) == s.state() for every valid session.

use crate::{
    config::GameContent,
    catalog::EntryKind,
    error::{SimError, SimResult},
    ledger::Ledger,
    ownership::Ownership,
    session::{Session, SessionState},
    stats::Statistics,
    types::{AchievementId, SessionId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bumped whenever the layout below changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version:    u32,
    pub session_id: SessionId,
    pub saved_at:   DateTime<Utc>,
    pub ledger:     Ledger,
    pub ownership:  Ownership,
    /// Sorted, no duplicates.
    pub unlocked:   Vec<AchievementId>,
    pub statistics: Statistics,
}

impl Snapshot {
    pub fn capture(session: &Session, saved_at: DateTime<Utc>) -> Self {
        let state = session.state();
        Self {
            version:    SNAPSHOT_VERSION,
            session_id: session.id().to_string(),
            saved_at,
            ledger:     state.ledger.clone(),
            ownership:  state.ownership.clone(),
            unlocked:   state.unlocked.iter().cloned().collect(),
            statistics: state.statistics.clone(),
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a persisted snapshot. Any shape error is `MalformedData`.
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::malformed(e.to_string()))
    }

    /// Validate against `content` and build the state to install.
    pub fn restore(&self, content: &GameContent) -> SimResult<SessionState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SimError::malformed(format!(
                "unsupported version {} (expected {SNAPSHOT_VERSION})", self.version
            )));
        }
        self.ledger.validate().map_err(SimError::malformed)?;
        self.statistics.validate().map_err(SimError::malformed)?;

        for (id, count) in self.ownership.iter() {
            let entry = content
                .catalog
                .entry(id)
                .ok_or_else(|| SimError::malformed(format!("unknown catalog entry '{id}'")))?;
            if entry.kind == EntryKind::Upgrade && count > 1 {
                return Err(SimError::malformed(format!(
                    "upgrade '{id}' owned {count} times"
                )));
            }
        }

        let mut unlocked = crate::achievement::UnlockedSet::new();
        for id in &self.unlocked {
            if !content.achievements.contains(id) {
                return Err(SimError::malformed(format!("unknown achievement '{id}'")));
            }
            if !unlocked.insert(id.clone()) {
                return Err(SimError::malformed(format!("achievement '{id}' listed twice")));
            }
        }

        Ok(SessionState {
            ledger:     self.ledger.clone(),
            ownership:  self.ownership.clone().normalized(),
            unlocked,
            statistics: self.statistics.clone(),
        })
    }
}
