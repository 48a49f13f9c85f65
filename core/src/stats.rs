//! Monotonic play statistics.
//!
//! RULE: counters only go up. `reset()` is the single exception and is
//! only reachable through an explicit session reset.

use crate::types::{Resource, Tick};
use serde::{Deserialize, Serialize};

/// Cumulative amount generated or collected per resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub coins:      f64,
    pub population: f64,
    pub happiness:  f64,
}

impl ResourceTotals {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Coins      => self.coins,
            Resource::Population => self.population,
            Resource::Happiness  => self.happiness,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        match resource {
            Resource::Coins      => self.coins += amount,
            Resource::Population => self.population += amount,
            Resource::Happiness  => self.happiness += amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub clicks:            u64,
    pub purchases:         u64,
    pub ticks:             Tick,
    pub seconds_simulated: f64,
    pub earned:            ResourceTotals,
}

impl Statistics {
    pub fn value(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::Clicks           => self.clicks as f64,
            Statistic::Purchases        => self.purchases as f64,
            Statistic::Ticks            => self.ticks as f64,
            Statistic::SecondsSimulated => self.seconds_simulated,
            Statistic::Earned(resource) => self.earned.get(resource),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let floats = [
            ("seconds_simulated", self.seconds_simulated),
            ("earned.coins", self.earned.coins),
            ("earned.population", self.earned.population),
            ("earned.happiness", self.earned.happiness),
        ];
        match floats.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, v)) => Err(format!("statistic {name} = {v} is not a non-negative number")),
            None => Ok(()),
        }
    }
}

/// A statistic an achievement can threshold on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Clicks,
    Purchases,
    Ticks,
    SecondsSimulated,
    Earned(Resource),
}
