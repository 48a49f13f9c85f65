//! hamlet-runner: headless host for the Hamlet simulation core.
//!
//! Usage:
//!   hamlet-runner --seed 12345 --ticks 3000 --db saves.db
//!   hamlet-runner --realtime --ticks 50
//!   hamlet-runner --ipc-mode --data-dir ./data

use anyhow::Result;
use hamlet_core::{
    autoplay::AutoPlayer,
    clock::{ManualClock, TimeSource, WallClock},
    config::GameConfig,
    economy::Rates,
    engine::GameEngine,
    error::SimError,
    event::SimEvent,
    ledger::Ledger,
    stats::Statistics,
    store::SaveStore,
    types::{EntryId, Tick},
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Collect { amount: f64 },
    Attract { amount: f64 },
    Purchase { entry: EntryId },
    Save,
    Load,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    session_id: String,
    tick:       Tick,
    ledger:     Ledger,
    rates:      Rates,
    ownership:  BTreeMap<String, u32>,
    unlocked:   Vec<String>,
    statistics: Statistics,
    events:     Vec<SimEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected:   Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 3000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str());

    let config = match data_dir {
        Some(dir) => GameConfig::load(dir)?,
        None => GameConfig::default_test(),
    };

    if !ipc_mode {
        println!("Hamlet: runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  db:        {db}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in)"));
        println!("  realtime:  {realtime}");
        println!();
    }

    let store = SaveStore::open(db)?;
    let mut engine = GameEngine::build(&config, store)?;
    if engine.load_latest()?.is_some() && !ipc_mode {
        println!("  resumed session {}", engine.session.id());
    }

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let mut player = AutoPlayer::new(seed, config.settings.clicks_per_tick);
        let mut time: Box<dyn TimeSource> = if realtime {
            Box::new(WallClock::new())
        } else {
            Box::new(ManualClock::new())
        };
        run_batch(&mut engine, &mut player, time.as_mut(), ticks)?;
        engine.save()?;
        print_summary(&engine);
    }

    Ok(())
}

fn run_batch(
    engine: &mut GameEngine,
    player: &mut AutoPlayer,
    time: &mut dyn TimeSource,
    ticks: u64,
) -> Result<()> {
    engine.start(time.now())?;
    for _ in 0..ticks {
        engine.play_turn(player)?;
        engine.run_ticks(time, 1)?;
    }
    engine.stop()?;
    Ok(())
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    // IPC ticks use virtual time at the nominal cadence.
    let interval = engine.scheduler.interval();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unknown command: {}", buffer.trim());
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut rejected = None;
        let outcome: Result<Vec<SimEvent>, SimError> = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(vec![]),
            IpcCommand::Tick { count } => (0..count).try_fold(Vec::new(), |mut acc, _| {
                acc.extend(engine.advance(interval)?);
                Ok(acc)
            }),
            IpcCommand::Collect { amount } => engine.collect_coins(amount),
            IpcCommand::Attract { amount } => engine.attract_population(amount),
            IpcCommand::Purchase { entry } => engine.purchase(&entry),
            IpcCommand::Save => engine.save().map(|s| vec![SimEvent::SessionSaved { session_id: s.session_id }]),
            IpcCommand::Load => engine.load_latest().map(|loaded| {
                loaded.unwrap_or_else(|| {
                    rejected = Some(format!("No save in slot '{}'", engine.slot()));
                    vec![]
                })
            }),
        };

        let state = match outcome {
            Ok(events) => build_ui_state(engine, events, rejected),
            Err(e) if e.is_user_facing() => build_ui_state(engine, vec![], Some(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &GameEngine, events: Vec<SimEvent>, rejected: Option<String>) -> UiState {
    let session = &engine.session;
    UiState {
        session_id: session.id().to_string(),
        tick:       session.statistics().ticks,
        ledger:     session.ledger().clone(),
        rates:      session.rates(),
        ownership:  session.ownership().iter().map(|(id, n)| (id.to_string(), n)).collect(),
        unlocked:   session.unlocked().iter().cloned().collect(),
        statistics: session.statistics().clone(),
        events,
        rejected,
    }
}

fn print_summary(engine: &GameEngine) {
    let session = &engine.session;
    let ledger = session.ledger();
    let rates = session.rates();
    let stats = session.statistics();

    println!("=== RUN SUMMARY ===");
    println!("  session:        {}", session.id());
    println!("  ticks:          {}", stats.ticks);
    println!("  simulated:      {:.1}s", stats.seconds_simulated);
    println!("  clicks:         {}", stats.clicks);
    println!("  purchases:      {}", stats.purchases);
    println!("  coins:          {:.0} (+{:.2}/s)", ledger.coins, rates.coins);
    println!("  population:     {:.1} (+{:.2}/s)", ledger.population, rates.population);
    println!("  happiness:      {:.1} (+{:.2}/s)", ledger.happiness, rates.happiness);
    println!("  coins earned:   {:.0}", stats.earned.coins);

    println!();
    println!("=== HOLDINGS ===");
    if session.ownership().is_empty() {
        println!("  (nothing owned)");
    }
    for (id, count) in session.ownership().iter() {
        println!("  {id:<14} x{count}");
    }

    println!();
    println!("=== ACHIEVEMENTS ({}/{}) ===",
        session.unlocked().len(),
        session.achievements().definitions().len());
    for def in session.achievements().definitions() {
        let mark = if session.unlocked().contains(&def.id) { "x" } else { " " };
        println!("  [{mark}] {}", def.label);
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
