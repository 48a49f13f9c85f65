//! Resource ledger: current quantities of every resource.
//!
//! RULE: amounts are never negative. Happiness is clamped to [0, HAPPINESS_CAP].
//! Coins and population are unbounded above.

use crate::{
    error::{SimError, SimResult},
    types::Resource,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HAPPINESS_CAP: f64 = 100.0;

/// An amount per resource: purchase prices, rewards, tick credits.
pub type Cost = BTreeMap<Resource, f64>;

/// The first resource the ledger cannot cover, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortfall {
    pub resource:  Resource,
    pub required:  f64,
    pub available: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub coins:      f64,
    pub population: f64,
    pub happiness:  f64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            coins:      0.0,
            population: 0.0,
            happiness:  HAPPINESS_CAP,
        }
    }
}

impl Ledger {
    pub fn amount(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Coins      => self.coins,
            Resource::Population => self.population,
            Resource::Happiness  => self.happiness,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Coins      => &mut self.coins,
            Resource::Population => &mut self.population,
            Resource::Happiness  => &mut self.happiness,
        }
    }

    /// Add a non-negative amount. Returns the amount actually applied,
    /// which is smaller than requested only when happiness hits its cap.
    pub fn credit(&mut self, resource: Resource, amount: f64) -> f64 {
        if !(amount > 0.0) || !amount.is_finite() {
            return 0.0;
        }
        let slot = self.slot(resource);
        let previous = *slot;
        let next = previous + amount;
        *slot = match resource {
            Resource::Happiness => next.min(HAPPINESS_CAP),
            _ => next,
        };
        *slot - previous
    }

    /// Subtract an amount. Fails without touching the ledger if the
    /// amount is negative or NaN, or the result would go negative.
    pub fn debit(&mut self, resource: Resource, amount: f64) -> SimResult<()> {
        if !(amount >= 0.0) {
            return Err(SimError::InvalidAmount { action: "debit", amount });
        }
        let slot = self.slot(resource);
        let next = *slot - amount;
        if next < 0.0 || !next.is_finite() {
            return Err(SimError::ResourceBoundViolation { resource, attempted: next });
        }
        *slot = next;
        Ok(())
    }

    /// Debit every resource in `cost`, or nothing at all.
    pub fn debit_all(&mut self, cost: &Cost) -> SimResult<()> {
        if let Some(short) = self.shortfall(cost) {
            return Err(SimError::ResourceBoundViolation {
                resource:  short.resource,
                attempted: short.available - short.required,
            });
        }
        for (resource, amount) in cost {
            self.debit(*resource, *amount)?;
        }
        Ok(())
    }

    /// The first resource (in ledger order) that `cost` exceeds, if any.
    pub fn shortfall(&self, cost: &Cost) -> Option<Shortfall> {
        cost.iter()
            .find(|(resource, required)| **required > self.amount(**resource))
            .map(|(resource, required)| Shortfall {
                resource:  *resource,
                required:  *required,
                available: self.amount(*resource),
            })
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.shortfall(cost).is_none()
    }

    /// Check every bound. Used when restoring a snapshot.
    pub fn validate(&self) -> Result<(), String> {
        for resource in Resource::ALL {
            let value = self.amount(resource);
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{resource} amount {value} is not a non-negative number"));
            }
        }
        if self.happiness > HAPPINESS_CAP {
            return Err(format!(
                "happiness {} exceeds cap {HAPPINESS_CAP}",
                self.happiness
            ));
        }
        Ok(())
    }
}
