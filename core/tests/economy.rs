//! Economy engine tests: rates, cost curves, tick crediting.

use hamlet_core::{
    catalog::Catalog,
    economy::{cost_of, credit_tick, rate_of, rates},
    ledger::{Ledger, HAPPINESS_CAP},
    ownership::Ownership,
    stats::Statistics,
    types::Resource,
};

fn owning(pairs: &[(&str, u32)]) -> Ownership {
    pairs.iter().map(|(id, n)| (id.to_string(), *n)).collect()
}

/// cost(n + 1) >= cost(n) for every entry and resource, well past any
/// realistic holding.
#[test]
fn cost_curve_is_non_decreasing() {
    let catalog = Catalog::standard();
    for entry in catalog.entries() {
        let mut previous = cost_of(&entry.id, &Ownership::new(), &catalog).unwrap();
        for n in 1..200u32 {
            let current = cost_of(&entry.id, &owning(&[(&entry.id, n)]), &catalog).unwrap();
            for (resource, amount) in &current {
                assert!(
                    *amount >= previous[resource],
                    "{} cost of {resource} dropped at n={n}: {} -> {amount}",
                    entry.id, previous[resource]
                );
            }
            previous = current;
        }
    }
}

#[test]
fn coin_costs_are_whole_numbers() {
    let catalog = Catalog::standard();
    for n in 0..50u32 {
        let cost = cost_of("farm", &owning(&[("farm", n)]), &catalog).unwrap();
        let coins = cost[&Resource::Coins];
        assert_eq!(coins, coins.round(), "farm cost at n={n} is fractional: {coins}");
    }
}

#[test]
fn unknown_entry_has_no_cost() {
    assert!(cost_of("castle", &Ownership::new(), &Catalog::standard()).is_err());
}

#[test]
fn rate_sums_owned_units_times_effect() {
    let catalog = Catalog::standard();
    let ownership = owning(&[("farm", 3), ("market", 2), ("better_tools", 1), ("house", 4)]);

    // 3 × 1.0 + 2 × 5.0 + 1 × 2.0
    assert!((rate_of(Resource::Coins, &ownership, &catalog) - 15.0).abs() < 1e-9);
    // 4 × 0.1
    assert!((rate_of(Resource::Population, &ownership, &catalog) - 0.4).abs() < 1e-9);
    assert_eq!(rate_of(Resource::Happiness, &ownership, &catalog), 0.0);

    let all = rates(&ownership, &catalog);
    assert_eq!(all.get(Resource::Coins), rate_of(Resource::Coins, &ownership, &catalog));
}

#[test]
fn rates_are_deterministic_and_non_negative() {
    let catalog = Catalog::standard();
    let ownership = owning(&[("park", 7), ("town_square", 1), ("workshop", 2)]);
    let a = rates(&ownership, &catalog);
    let b = rates(&ownership, &catalog);
    assert_eq!(a, b);
    for resource in Resource::ALL {
        assert!(a.get(resource) >= 0.0, "{resource} rate is negative");
    }
}

/// Two ticks of t1 and t2 land where one tick of t1 + t2 does.
#[test]
fn credit_tick_is_linear_in_elapsed_time() {
    let catalog = Catalog::standard();
    let ownership = owning(&[("farm", 5), ("house", 3), ("market", 1)]);
    let start = Ledger { coins: 17.0, population: 2.5, happiness: 40.0 };

    for (t1, t2) in [(0.1, 0.1), (0.05, 1.7), (3.0, 0.013), (120.0, 60.0)] {
        let mut split = start.clone();
        let mut stats_split = Statistics::default();
        credit_tick(&mut split, &ownership, &mut stats_split, &catalog, t1);
        credit_tick(&mut split, &ownership, &mut stats_split, &catalog, t2);

        let mut whole = start.clone();
        let mut stats_whole = Statistics::default();
        credit_tick(&mut whole, &ownership, &mut stats_whole, &catalog, t1 + t2);

        for resource in Resource::ALL {
            let (a, b) = (split.amount(resource), whole.amount(resource));
            assert!(
                (a - b).abs() <= 1e-9 * a.abs().max(1.0),
                "{resource} diverged for t1={t1} t2={t2}: split={a} whole={b}"
            );
        }
    }
}

#[test]
fn credit_tick_clamps_happiness_and_records_applied_amounts() {
    let catalog = Catalog::standard();
    let ownership = owning(&[("park", 10)]); // 0.5 happiness/s
    let mut ledger = Ledger { happiness: 99.0, ..Ledger::default() };
    let mut stats = Statistics::default();

    let credited = credit_tick(&mut ledger, &ownership, &mut stats, &catalog, 10.0);

    assert_eq!(ledger.happiness, HAPPINESS_CAP);
    assert!((credited[&Resource::Happiness] - 1.0).abs() < 1e-9);
    assert!((stats.earned.happiness - 1.0).abs() < 1e-9);
    assert!((stats.seconds_simulated - 10.0).abs() < 1e-12);
}

#[test]
fn credit_tick_accumulates_earned_statistics() {
    let catalog = Catalog::standard();
    let ownership = owning(&[("farm", 2)]);
    let mut ledger = Ledger::default();
    let mut stats = Statistics::default();

    for _ in 0..10 {
        credit_tick(&mut ledger, &ownership, &mut stats, &catalog, 0.5);
    }

    assert!((ledger.coins - 10.0).abs() < 1e-9);
    assert!((stats.earned.coins - 10.0).abs() < 1e-9);
}
