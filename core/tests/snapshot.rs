//! Snapshot codec tests: round-trip law, full replacement, rejection.

use chrono::{TimeZone, Utc};
use hamlet_core::{
    achievement::UnlockedSet,
    catalog::EntryKind,
    config::GameContent,
    error::SimError,
    ledger::{Ledger, HAPPINESS_CAP},
    ownership::Ownership,
    rng::BotRng,
    session::{Session, SessionState},
    snapshot::Snapshot,
    stats::{ResourceTotals, Statistics},
};
use std::sync::Arc;

fn content() -> Arc<GameContent> {
    Arc::new(GameContent::standard())
}

/// A random but valid state for the standard content.
fn arbitrary_state(rng: &mut BotRng, content: &GameContent) -> SessionState {
    let scale = [1.0, 1e3, 1e9, 1e12][rng.next_u64_below(4) as usize];
    let ownership: Ownership = content
        .catalog
        .entries()
        .iter()
        .map(|e| {
            let max = if e.kind == EntryKind::Upgrade { 2 } else { 500 };
            (e.id.clone(), rng.next_u64_below(max) as u32)
        })
        .collect();
    let unlocked: UnlockedSet = content
        .achievements
        .definitions()
        .iter()
        .filter(|_| rng.chance(0.5))
        .map(|d| d.id.clone())
        .collect();
    SessionState {
        ledger: Ledger {
            coins:      rng.next_f64() * scale,
            population: rng.next_f64() * scale,
            happiness:  rng.next_f64() * HAPPINESS_CAP,
        },
        ownership,
        unlocked,
        statistics: Statistics {
            clicks:            rng.next_u64_below(1 << 40),
            purchases:         rng.next_u64_below(1 << 20),
            ticks:             rng.next_u64_below(1 << 40),
            seconds_simulated: rng.next_f64() * 1e7,
            earned: ResourceTotals {
                coins:      rng.next_f64() * scale * 10.0,
                population: rng.next_f64() * scale,
                happiness:  rng.next_f64() * 1e4,
            },
        },
    }
}

#[test]
fn round_trip_preserves_arbitrary_sessions() {
    let content = content();
    let mut rng = BotRng::new(0xC0DE_C0DE);

    for i in 0..500 {
        let state = arbitrary_state(&mut rng, &content);
        let session = Session::with_state(content.clone(), state.clone());

        let json = session.save().to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap().restore(&content).unwrap();

        assert_eq!(restored, state, "round trip {i} diverged");
    }
}

#[test]
fn round_trip_preserves_zero_and_huge_sessions() {
    let content = content();
    let zero = SessionState {
        ledger: Ledger { coins: 0.0, population: 0.0, happiness: 0.0 },
        ..SessionState::default()
    };
    let huge = SessionState {
        ledger: Ledger { coins: 4_294_967_296_123.0, population: 1.5e9, happiness: HAPPINESS_CAP },
        ownership: [("farm".to_string(), 4_000_000)].into_iter().collect(),
        ..SessionState::default()
    };

    for state in [zero, huge] {
        let session = Session::with_state(content.clone(), state.clone());
        let mut target = Session::new(content.clone());
        target.load(&session.save()).unwrap();
        assert_eq!(target.state(), &state);
    }
}

/// Save at coins=100, population=25, houses=2; zero the live state; load.
#[test]
fn save_mutate_load_restores_saved_values() {
    let mut session = Session::new(content());
    session.collect_coins(120.0).unwrap();
    session.purchase("house").unwrap(); // 10
    session.purchase("house").unwrap(); // 12
    session.collect_coins(2.0).unwrap();
    session.attract_population(25.0).unwrap();

    assert_eq!(session.ledger().coins, 100.0);
    assert_eq!(session.ledger().population, 25.0);
    assert_eq!(session.ownership().count("house"), 2);

    let saved = session.save();
    let saved_state = session.state().clone();

    session.reset();
    assert_eq!(session.ledger().coins, 0.0);
    assert_eq!(session.ownership().count("house"), 0);

    session.load(&saved).unwrap();
    assert_eq!(session.ledger().coins, 100.0);
    assert_eq!(session.ledger().population, 25.0);
    assert_eq!(session.ownership().count("house"), 2);
    assert_eq!(session.state(), &saved_state);
    assert_eq!(session.id(), saved.session_id);
}

#[test]
fn load_replaces_rather_than_merges() {
    let content = content();
    let mut saved_from = Session::new(content.clone());
    saved_from.collect_coins(5.0).unwrap();
    let snapshot = saved_from.save();

    let mut live = Session::new(content);
    live.collect_coins(500.0).unwrap();
    live.purchase("farm").unwrap();
    live.load(&snapshot).unwrap();

    assert_eq!(live.ownership().count("farm"), 0);
    assert_eq!(live.ledger().coins, 5.0);
    assert!(!live.unlocked().contains("pocket_change"));
    assert_eq!(live.statistics().purchases, 0);
}

#[test]
fn malformed_snapshots_leave_session_untouched() {
    let content = content();
    let mut session = Session::new(content.clone());
    session.collect_coins(42.0).unwrap();
    let good = session.save();
    let before = session.state().clone();
    let id_before = session.id().to_string();

    let mut negative = good.clone();
    negative.ledger.coins = -1.0;

    let mut too_happy = good.clone();
    too_happy.ledger.happiness = HAPPINESS_CAP + 0.5;

    let mut unknown_entry = good.clone();
    unknown_entry.ownership = [("castle".to_string(), 1)].into_iter().collect();

    let mut unknown_achievement = good.clone();
    unknown_achievement.unlocked.push("moon_landing".into());

    let mut duplicate_achievement = good.clone();
    duplicate_achievement.unlocked = vec!["first_click".into(), "first_click".into()];

    let mut bad_stats = good.clone();
    bad_stats.statistics.seconds_simulated = f64::NAN;

    for bad in [negative, too_happy, unknown_entry, unknown_achievement, duplicate_achievement, bad_stats] {
        let err = session.load(&bad).unwrap_err();
        assert!(matches!(err, SimError::MalformedData { .. }), "got {err}");
        assert_eq!(session.state(), &before);
        assert_eq!(session.id(), id_before);
    }
}

#[test]
fn wrong_shape_json_is_malformed() {
    let cases = [
        "",
        "not json",
        "{}",
        r#"{"version":1,"session_id":"x","saved_at":"2026-01-01T00:00:00Z"}"#,
        r#"{"version":1,"session_id":"x","saved_at":"2026-01-01T00:00:00Z",
            "ledger":{"coins":"lots","population":0,"happiness":0},
            "ownership":{},"unlocked":[],"statistics":{}}"#,
    ];
    for json in cases {
        assert!(
            matches!(Snapshot::from_json(json), Err(SimError::MalformedData { .. })),
            "accepted: {json}"
        );
    }
}

#[test]
fn capture_records_the_given_timestamp() {
    let session = Session::new(content());
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let snapshot = Snapshot::capture(&session, at);
    assert_eq!(snapshot.saved_at, at);
    let parsed = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(parsed, snapshot);
}
