//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete simulation advancement.
pub type Tick = u64;

/// Stable identifier of a catalog entry (building or upgrade).
pub type EntryId = String;

/// Stable identifier of an achievement definition.
pub type AchievementId = String;

/// The canonical session identifier (UUID v4 text).
pub type SessionId = String;

/// Every resource the ledger tracks.
/// Variants are never reordered: ledger order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Coins,
    Population,
    Happiness,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Coins, Resource::Population, Resource::Happiness];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Coins      => "coins",
            Self::Population => "population",
            Self::Happiness  => "happiness",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
