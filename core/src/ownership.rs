//! Owned building counts and one-time upgrade flags.

use crate::types::EntryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry id → owned count. Upgrades are owned at most once.
/// Zero counts are never stored, so equal holdings compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ownership {
    counts: BTreeMap<EntryId, u32>,
}

impl Ownership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn owns(&self, id: &str) -> bool {
        self.count(id) > 0
    }

    /// Add one unit. Returns the new count.
    pub fn increment(&mut self, id: &str) -> u32 {
        let count = self.counts.entry(id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, n)| (id.as_str(), *n))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.counts.values().map(|&n| n as u64).sum()
    }

    /// Drop zero entries left over from external data.
    pub(crate) fn normalized(mut self) -> Self {
        self.counts.retain(|_, n| *n > 0);
        self
    }
}

impl FromIterator<(EntryId, u32)> for Ownership {
    fn from_iter<I: IntoIterator<Item = (EntryId, u32)>>(iter: I) -> Self {
        Self { counts: iter.into_iter().collect() }.normalized()
    }
}
