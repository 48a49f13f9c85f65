//! Catalog: static definitions of buildings and upgrades.
//!
//! Entries are immutable once the catalog is built. Definition order
//! is preserved and is the order the presentation layer lists them in.

use crate::{
    error::{SimError, SimResult},
    ledger::{Cost, Ledger},
    ownership::Ownership,
    types::{EntryId, Resource},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Bought repeatedly; each unit gets more expensive.
    Building,
    /// Bought once.
    Upgrade,
}

/// Passive generation granted per owned unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub resource:   Resource,
    pub per_second: f64,
}

/// What must hold before an entry can be bought.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prerequisite {
    #[default]
    None,
    MinResource { resource: Resource, amount: f64 },
    Owns { entry: EntryId, count: u32 },
    All { all: Vec<Prerequisite> },
}

impl Prerequisite {
    pub fn is_met(&self, ledger: &Ledger, ownership: &Ownership) -> bool {
        match self {
            Self::None => true,
            Self::MinResource { resource, amount } => ledger.amount(*resource) >= *amount,
            Self::Owns { entry, count } => ownership.count(entry) >= *count,
            Self::All { all } => all.iter().all(|p| p.is_met(ledger, ownership)),
        }
    }

    fn referenced_entries<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Owns { entry, .. } => out.push(entry),
            Self::All { all } => all.iter().for_each(|p| p.referenced_entries(out)),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id:          EntryId,
    pub label:       String,
    #[serde(default)]
    pub description: String,
    pub kind:        EntryKind,
    pub base_cost:   Cost,
    /// Multiplier applied once per unit already owned. Always >= 1.
    pub cost_growth: f64,
    #[serde(default)]
    pub effects:     Vec<Effect>,
    #[serde(default)]
    pub prerequisite: Prerequisite,
}

impl CatalogEntry {
    /// Per-unit generation of `resource`, zero if the entry does not touch it.
    pub fn effect_on(&self, resource: Resource) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.resource == resource)
            .map(|e| e.per_second)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index:   HashMap<EntryId, usize>,
}

impl Catalog {
    /// Build and validate a catalog.
    pub fn new(entries: Vec<CatalogEntry>) -> SimResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(SimError::invalid_content(format!(
                    "duplicate catalog entry '{}'", entry.id
                )));
            }
        }

        for entry in &entries {
            if !(entry.cost_growth >= 1.0) || !entry.cost_growth.is_finite() {
                return Err(SimError::invalid_content(format!(
                    "'{}' cost_growth {} must be a finite number >= 1",
                    entry.id, entry.cost_growth
                )));
            }
            if let Some((resource, amount)) = entry
                .base_cost
                .iter()
                .find(|(_, a)| !a.is_finite() || **a < 0.0)
            {
                return Err(SimError::invalid_content(format!(
                    "'{}' base cost {amount} {resource} must be non-negative", entry.id
                )));
            }
            if let Some(effect) = entry
                .effects
                .iter()
                .find(|e| !e.per_second.is_finite() || e.per_second < 0.0)
            {
                return Err(SimError::invalid_content(format!(
                    "'{}' effect on {} must be non-negative", entry.id, effect.resource
                )));
            }
            let mut refs = Vec::new();
            entry.prerequisite.referenced_entries(&mut refs);
            if let Some(missing) = refs.into_iter().find(|r| !index.contains_key(*r)) {
                return Err(SimError::invalid_content(format!(
                    "'{}' prerequisite references unknown entry '{missing}'", entry.id
                )));
            }
        }

        Ok(Self { entries, index })
    }

    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All entries in definition order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The built-in hamlet catalog.
    pub fn standard() -> Self {
        let coins = |n: f64| -> Cost { [(Resource::Coins, n)].into() };
        let entries = vec![
            building("house", "House", "Shelter that draws new settlers.",
                coins(10.0), 1.15,
                vec![effect(Resource::Population, 0.1)],
                Prerequisite::None),
            building("farm", "Farm", "Sells its harvest at the gate.",
                coins(50.0), 1.15,
                vec![effect(Resource::Coins, 1.0)],
                Prerequisite::None),
            building("market", "Market", "Trade brings steady coin.",
                [(Resource::Coins, 200.0), (Resource::Population, 5.0)].into(), 1.2,
                vec![effect(Resource::Coins, 5.0)],
                Prerequisite::Owns { entry: "farm".into(), count: 1 }),
            building("park", "Park", "Green space keeps spirits up.",
                coins(500.0), 1.25,
                vec![effect(Resource::Happiness, 0.05)],
                Prerequisite::MinResource { resource: Resource::Population, amount: 10.0 }),
            building("workshop", "Workshop", "Hard work, good pay.",
                [(Resource::Coins, 1500.0), (Resource::Population, 20.0), (Resource::Happiness, 5.0)].into(),
                1.2,
                vec![effect(Resource::Coins, 20.0)],
                Prerequisite::Owns { entry: "market".into(), count: 3 }),
            upgrade("better_tools", "Better Tools", "Farmhands work faster.",
                coins(100.0),
                vec![effect(Resource::Coins, 2.0)],
                Prerequisite::Owns { entry: "farm".into(), count: 1 }),
            upgrade("town_square", "Town Square", "A place to gather and settle.",
                coins(1000.0),
                vec![effect(Resource::Population, 0.5), effect(Resource::Happiness, 0.1)],
                Prerequisite::All { all: vec![
                    Prerequisite::MinResource { resource: Resource::Population, amount: 25.0 },
                    Prerequisite::Owns { entry: "house".into(), count: 5 },
                ]}),
        ];
        // Built-in content is fixed; failing validation here is a programming error.
        Self::new(entries).expect("standard catalog is valid")
    }
}

fn effect(resource: Resource, per_second: f64) -> Effect {
    Effect { resource, per_second }
}

fn building(
    id: &str,
    label: &str,
    description: &str,
    base_cost: Cost,
    cost_growth: f64,
    effects: Vec<Effect>,
    prerequisite: Prerequisite,
) -> CatalogEntry {
    CatalogEntry {
        id: id.into(),
        label: label.into(),
        description: description.into(),
        kind: EntryKind::Building,
        base_cost,
        cost_growth,
        effects,
        prerequisite,
    }
}

fn upgrade(
    id: &str,
    label: &str,
    description: &str,
    base_cost: Cost,
    effects: Vec<Effect>,
    prerequisite: Prerequisite,
) -> CatalogEntry {
    CatalogEntry {
        kind: EntryKind::Upgrade,
        ..building(id, label, description, base_cost, 1.0, effects, prerequisite)
    }
}
