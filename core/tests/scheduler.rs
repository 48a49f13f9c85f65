//! Tick scheduler tests: state machine, measured elapsed time, stop semantics.

use hamlet_core::{
    clock::{ManualClock, TimeSource},
    config::GameContent,
    engine::GameEngine,
    scheduler::{SchedulerState, TickScheduler},
    session::{Session, SessionState},
    ownership::Ownership,
};
use std::sync::Arc;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Session owning `farms` farms (1 coin/s each) and nothing else.
fn farming_session(farms: u32) -> Session {
    let state = SessionState {
        ownership: [("farm".to_string(), farms)].into_iter().collect::<Ownership>(),
        ..SessionState::default()
    };
    Session::with_state(Arc::new(GameContent::standard()), state)
}

#[test]
fn starts_stopped_and_only_ticks_while_running() {
    let mut session = farming_session(1);
    let mut scheduler = TickScheduler::new(ms(100));
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    assert!(scheduler.poll(ms(500), &mut session).unwrap().is_none());
    assert_eq!(session.statistics().ticks, 0);

    assert!(scheduler.start(ms(500)));
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert!(scheduler.poll(ms(550), &mut session).unwrap().is_none(), "fired early");
    assert!(scheduler.poll(ms(600), &mut session).unwrap().is_some());
    assert_eq!(session.statistics().ticks, 1);
}

#[test]
fn start_while_running_is_a_no_op() {
    let mut session = farming_session(1);
    let mut scheduler = TickScheduler::new(ms(100));
    assert!(scheduler.start(ms(0)));
    assert!(!scheduler.start(ms(90)), "re-entrant start must not restart");

    // Baseline is still t=0, so a tick is due at 100 ms.
    assert!(scheduler.poll(ms(100), &mut session).unwrap().is_some());
    assert!((session.ledger().coins - 0.1).abs() < 1e-9);
}

/// Elapsed time is the measured delta, not the nominal interval.
#[test]
fn credits_measured_delta_under_jitter() {
    let mut session = farming_session(10); // 10 coins/s
    let mut scheduler = TickScheduler::new(ms(100));
    scheduler.start(ms(0));

    scheduler.poll(ms(130), &mut session).unwrap().expect("due");
    assert!((session.ledger().coins - 1.3).abs() < 1e-9);

    // Suspended host: next callback arrives 5 s late.
    scheduler.poll(ms(5_130), &mut session).unwrap().expect("due");
    assert!((session.ledger().coins - 51.3).abs() < 1e-9);
    assert!((session.statistics().seconds_simulated - 5.13).abs() < 1e-9);
}

#[test]
fn run_ticks_with_jittery_clock_credits_total_elapsed_time() {
    let mut engine = GameEngine::build_test().unwrap();
    engine.session = farming_session(2);
    let mut clock = ManualClock::with_jitter(vec![ms(3), ms(0), ms(11)]);

    engine.run_ticks(&mut clock, 30).unwrap();

    let session = &engine.session;
    assert_eq!(session.statistics().ticks, 30);
    assert_eq!(engine.scheduler.ticks_issued(), 30);
    let simulated = clock.now().as_secs_f64();
    assert!((session.statistics().seconds_simulated - simulated).abs() < 1e-9);
    assert!((session.ledger().coins - 2.0 * simulated).abs() < 1e-9);
}

#[test]
fn stop_takes_effect_before_next_tick() {
    let mut session = farming_session(1);
    let mut scheduler = TickScheduler::new(ms(100));
    scheduler.start(ms(0));
    scheduler.poll(ms(100), &mut session).unwrap();

    assert!(scheduler.stop());
    assert!(!scheduler.stop());
    let before = session.state().clone();
    assert!(scheduler.poll(ms(200), &mut session).unwrap().is_none());
    assert!(scheduler.poll(ms(10_000), &mut session).unwrap().is_none());
    assert_eq!(session.state(), &before);
}

#[test]
fn time_spent_stopped_is_not_credited() {
    let mut session = farming_session(1);
    let mut scheduler = TickScheduler::new(ms(100));
    scheduler.start(ms(0));
    scheduler.poll(ms(100), &mut session).unwrap();
    scheduler.stop();

    scheduler.start(ms(60_000));
    scheduler.poll(ms(60_100), &mut session).unwrap().expect("due");

    assert!((session.ledger().coins - 0.2).abs() < 1e-9);
}

/// Loading a save never credits the time that passed since it was taken.
#[test]
fn load_does_not_credit_offline_time() {
    let mut session = farming_session(5);
    let mut scheduler = TickScheduler::new(ms(100));
    scheduler.start(ms(0));
    scheduler.poll(ms(100), &mut session).unwrap();
    let snapshot = session.save();
    let saved_coins = session.ledger().coins;

    let mut restored = Session::new(session.content().clone());
    restored.load(&snapshot).unwrap();
    assert_eq!(restored.ledger().coins, saved_coins);

    // The next tick on the restored session covers one interval only.
    let mut fresh = TickScheduler::new(ms(100));
    fresh.start(ms(3_600_000));
    fresh.poll(ms(3_600_100), &mut restored).unwrap().expect("due");
    assert!((restored.ledger().coins - (saved_coins + 0.5)).abs() < 1e-9);
}

#[test]
fn direct_tick_drives_simulated_time() {
    let mut session = farming_session(3);
    let mut scheduler = TickScheduler::default();
    for _ in 0..10 {
        scheduler.tick(&mut session, ms(250)).unwrap();
    }
    assert!((session.ledger().coins - 7.5).abs() < 1e-9);
    assert_eq!(session.statistics().ticks, 10);
}
