//! Economy engine: generation rates, cost curves, purchases, tick credit.
//!
//! Pure functions over explicit state. Nothing here holds hidden state;
//! the session owns the ledger, ownership and statistics it passes in.
//!
//!   rate(r)      = Σ owned(e) × effect(e, r)
//!   cost(e, n)   = round(base(e) × growth(e)^n)     n = units already owned
//!   credit(r, t) = rate(r) × t

use crate::{
    catalog::{Catalog, EntryKind},
    error::{SimError, SimResult},
    ledger::{Cost, Ledger},
    ownership::Ownership,
    stats::Statistics,
    types::{EntryId, Resource},
};
use serde::{Deserialize, Serialize};

/// Per-second generation of every resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub coins:      f64,
    pub population: f64,
    pub happiness:  f64,
}

impl Rates {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Coins      => self.coins,
            Resource::Population => self.population,
            Resource::Happiness  => self.happiness,
        }
    }
}

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub entry:     EntryId,
    pub cost:      Cost,
    pub new_count: u32,
}

/// Per-second generation of `resource` from everything owned.
pub fn rate_of(resource: Resource, ownership: &Ownership, catalog: &Catalog) -> f64 {
    catalog
        .entries()
        .iter()
        .map(|entry| ownership.count(&entry.id) as f64 * entry.effect_on(resource))
        .sum()
}

pub fn rates(ownership: &Ownership, catalog: &Catalog) -> Rates {
    Rates {
        coins:      rate_of(Resource::Coins, ownership, catalog),
        population: rate_of(Resource::Population, ownership, catalog),
        happiness:  rate_of(Resource::Happiness, ownership, catalog),
    }
}

/// Price of the next unit of `entry_id`, in whole units per resource.
pub fn cost_of(entry_id: &str, ownership: &Ownership, catalog: &Catalog) -> SimResult<Cost> {
    let entry = catalog
        .entry(entry_id)
        .ok_or_else(|| SimError::UnknownEntry { entry: entry_id.to_string() })?;
    Ok(cost_at(&entry.base_cost, entry.cost_growth, ownership.count(entry_id)))
}

/// Cost curve evaluated at `owned` units already held.
pub fn cost_at(base: &Cost, growth: f64, owned: u32) -> Cost {
    let factor = growth.powi(owned.min(i32::MAX as u32) as i32);
    base.iter()
        .map(|(resource, amount)| (*resource, (amount * factor).round()))
        .collect()
}

/// Dry run of `purchase`: the cost on success, the rejection otherwise.
/// Checks run in a fixed order: unknown, already owned, locked, funds.
pub fn check_purchase(
    entry_id: &str,
    ledger: &Ledger,
    ownership: &Ownership,
    catalog: &Catalog,
) -> SimResult<Cost> {
    let entry = catalog
        .entry(entry_id)
        .ok_or_else(|| SimError::UnknownEntry { entry: entry_id.to_string() })?;

    if entry.kind == EntryKind::Upgrade && ownership.owns(entry_id) {
        return Err(SimError::AlreadyOwned { entry: entry_id.to_string() });
    }
    if !entry.prerequisite.is_met(ledger, ownership) {
        return Err(SimError::Locked { entry: entry_id.to_string() });
    }

    let cost = cost_at(&entry.base_cost, entry.cost_growth, ownership.count(entry_id));
    if let Some(short) = ledger.shortfall(&cost) {
        return Err(SimError::InsufficientFunds {
            entry:     entry_id.to_string(),
            resource:  short.resource,
            required:  short.required,
            available: short.available,
        });
    }
    Ok(cost)
}

/// Buy one unit. Atomic: on any error the ledger, ownership and
/// statistics are untouched.
pub fn purchase(
    entry_id: &str,
    ledger: &mut Ledger,
    ownership: &mut Ownership,
    stats: &mut Statistics,
    catalog: &Catalog,
) -> SimResult<PurchaseReceipt> {
    let cost = check_purchase(entry_id, ledger, ownership, catalog)?;

    ledger.debit_all(&cost)?;
    let new_count = ownership.increment(entry_id);
    stats.purchases += 1;

    log::debug!("purchased {entry_id} (now {new_count}) for {cost:?}");

    Ok(PurchaseReceipt {
        entry: entry_id.to_string(),
        cost,
        new_count,
    })
}

/// Credit `elapsed_seconds` of generation. Returns what was actually
/// applied per resource (happiness may be cut short by its cap).
pub fn credit_tick(
    ledger: &mut Ledger,
    ownership: &Ownership,
    stats: &mut Statistics,
    catalog: &Catalog,
    elapsed_seconds: f64,
) -> Cost {
    let mut credited = Cost::new();
    if !(elapsed_seconds > 0.0) || !elapsed_seconds.is_finite() {
        return credited;
    }

    for resource in Resource::ALL {
        let rate = rate_of(resource, ownership, catalog);
        if rate <= 0.0 {
            continue;
        }
        let applied = ledger.credit(resource, rate * elapsed_seconds);
        stats.earned.add(resource, applied);
        if applied > 0.0 {
            credited.insert(resource, applied);
        }
    }
    stats.seconds_simulated += elapsed_seconds;
    credited
}
