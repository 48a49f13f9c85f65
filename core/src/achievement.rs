//! Achievement evaluator: one-time unlocks driven by typed predicates.
//!
//! RULES:
//!   - Definitions are evaluated in insertion order after every mutation.
//!   - An unlocked achievement is never evaluated again and never removed.
//!   - Every unlock satisfied in a pass fires in that pass. Rewards are
//!     credited immediately, so later definitions see them.

use crate::{
    catalog::Catalog,
    error::{SimError, SimResult},
    event::SimEvent,
    ledger::{Cost, Ledger},
    ownership::Ownership,
    stats::{Statistic, Statistics},
    types::{AchievementId, EntryId, Resource},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    ResourceAtLeast { resource: Resource, amount: f64 },
    OwnsAtLeast { entry: EntryId, count: u32 },
    StatisticAtLeast { statistic: Statistic, value: f64 },
    All { all: Vec<Predicate> },
}

impl Predicate {
    pub fn holds(&self, ledger: &Ledger, ownership: &Ownership, stats: &Statistics) -> bool {
        match self {
            Self::ResourceAtLeast { resource, amount } => ledger.amount(*resource) >= *amount,
            Self::OwnsAtLeast { entry, count } => ownership.count(entry) >= *count,
            Self::StatisticAtLeast { statistic, value } => stats.value(*statistic) >= *value,
            Self::All { all } => all.iter().all(|p| p.holds(ledger, ownership, stats)),
        }
    }

    fn unknown_entry<'a>(&'a self, catalog: &Catalog) -> Option<&'a str> {
        match self {
            Self::OwnsAtLeast { entry, .. } if !catalog.contains(entry) => Some(entry.as_str()),
            Self::All { all } => all.iter().find_map(|p| p.unknown_entry(catalog)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id:        AchievementId,
    pub label:     String,
    pub predicate: Predicate,
    /// One-time grant applied on unlock. Empty for none.
    #[serde(default)]
    pub reward:    Cost,
}

/// The set of unlocked achievement ids.
pub type UnlockedSet = BTreeSet<AchievementId>;

/// Ordered, validated achievement definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementBook {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementBook {
    pub fn new(definitions: Vec<AchievementDefinition>, catalog: &Catalog) -> SimResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.id.as_str()) {
                return Err(SimError::invalid_content(format!(
                    "duplicate achievement '{}'", def.id
                )));
            }
            if let Some(entry) = def.predicate.unknown_entry(catalog) {
                return Err(SimError::invalid_content(format!(
                    "achievement '{}' references unknown entry '{entry}'", def.id
                )));
            }
            if def.reward.values().any(|a| !a.is_finite() || *a < 0.0) {
                return Err(SimError::invalid_content(format!(
                    "achievement '{}' reward must be non-negative", def.id
                )));
            }
        }
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.iter().any(|d| d.id == id)
    }

    /// Built-in achievements for the standard catalog.
    pub fn standard(catalog: &Catalog) -> SimResult<Self> {
        use Predicate::*;
        let def = |id: &str, label: &str, predicate: Predicate, reward: Cost| AchievementDefinition {
            id: id.into(),
            label: label.into(),
            predicate,
            reward,
        };
        Self::new(
            vec![
                def("first_click", "First Coin",
                    StatisticAtLeast { statistic: Statistic::Clicks, value: 1.0 },
                    Cost::new()),
                def("homeowner", "Homeowner",
                    OwnsAtLeast { entry: "house".into(), count: 1 },
                    Cost::new()),
                def("pocket_change", "Pocket Change",
                    ResourceAtLeast { resource: Resource::Coins, amount: 100.0 },
                    Cost::new()),
                def("village", "Village",
                    ResourceAtLeast { resource: Resource::Population, amount: 25.0 },
                    [(Resource::Happiness, 5.0)].into()),
                def("builder", "Builder",
                    StatisticAtLeast { statistic: Statistic::Purchases, value: 10.0 },
                    [(Resource::Coins, 50.0)].into()),
                def("patient", "Patience",
                    StatisticAtLeast { statistic: Statistic::Ticks, value: 600.0 },
                    Cost::new()),
                def("tycoon", "Tycoon",
                    StatisticAtLeast { statistic: Statistic::Earned(Resource::Coins), value: 10_000.0 },
                    [(Resource::Coins, 250.0)].into()),
                def("thriving", "Thriving Town",
                    All { all: vec![
                        ResourceAtLeast { resource: Resource::Population, amount: 100.0 },
                        ResourceAtLeast { resource: Resource::Happiness, amount: 90.0 },
                    ]},
                    [(Resource::Coins, 1000.0)].into()),
            ],
            catalog,
        )
    }
}

/// Evaluate every still-locked achievement against current state.
/// Returns one `AchievementUnlocked` event per new unlock, in definition order.
pub fn evaluate(
    book: &AchievementBook,
    ledger: &mut Ledger,
    ownership: &Ownership,
    stats: &Statistics,
    unlocked: &mut UnlockedSet,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for def in &book.definitions {
        if unlocked.contains(&def.id) || !def.predicate.holds(ledger, ownership, stats) {
            continue;
        }
        unlocked.insert(def.id.clone());
        for (resource, amount) in &def.reward {
            ledger.credit(*resource, *amount);
        }
        log::info!("achievement unlocked: {}", def.id);
        events.push(SimEvent::AchievementUnlocked {
            achievement: def.id.clone(),
            label:       def.label.clone(),
            reward:      def.reward.clone(),
        });
    }
    events
}
