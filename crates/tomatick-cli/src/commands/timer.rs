use std::io::Write as _;
use std::time::Duration;

use clap::Subcommand;
use tomatick_core::storage::Database;
use tomatick_core::timer::format_mmss;
use tomatick_core::{
    cue_for_event, Clock, Config, CueBus, Event, NullCue, TimerEngine, TimerState,
};

use crate::cue::TerminalBell;

const ENGINE_KEY: &str = "timer_engine";

/// Refresh cadence: fast while the countdown is live, relaxed while idle.
const RUNNING_POLL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_secs(1);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (no-op if already running)
    Start,
    /// Pause the live countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Abandon the interval; logs an incomplete session
    Stop,
    /// Return to a fresh work interval without logging anything
    Reset,
    /// Tick once and print the current timer state as JSON
    Status,
    /// Poll the timer continuously, recording completions as they happen
    Watch {
        /// Start the countdown before watching if the timer is idle
        #[arg(long)]
        start: bool,
    },
}

fn load_engine(db: &Database, config: &Config) -> TimerEngine {
    let durations = config.engine_durations();
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(mut engine) = serde_json::from_str::<TimerEngine>(&json) {
            // Configured durations changed since the snapshot was taken:
            // apply them (a live countdown keeps its current length).
            if engine.durations() != durations {
                engine.set_durations(durations);
            }
            return engine;
        }
    }
    TimerEngine::new(durations)
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Re-derive the cached today-count whenever the local date changes,
/// including the first load of a freshly created engine.
fn sync_today(
    db: &Database,
    engine: &mut TimerEngine,
    clock: &Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = clock.today();
    if engine.today() != Some(today) {
        engine.sync_today(db.completed_work_today(today)?, today);
    }
    Ok(())
}

fn cue_sink(config: &Config) -> Box<dyn CueBus> {
    if config.notifications.enabled {
        Box::new(TerminalBell)
    } else {
        Box::new(NullCue)
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let clock = config.wall_clock()?;
    let mut engine = load_engine(&db, &config);
    sync_today(&db, &mut engine, &clock)?;

    match action {
        TimerAction::Start => {
            let event = engine.start();
            save_engine(&db, &engine)?;
            if let Some(event) = &event {
                if let Some(kind) = cue_for_event(event) {
                    cue_sink(&config).play(kind);
                }
                println!("{}", serde_json::to_string_pretty(event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
        }
        TimerAction::Pause => {
            let event = if engine.state() == TimerState::Running {
                engine.toggle_pause()
            } else {
                None
            };
            save_engine(&db, &engine)?;
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Resume => {
            let event = if engine.state() == TimerState::Paused {
                engine.toggle_pause()
            } else {
                None
            };
            save_engine(&db, &engine)?;
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Stop => {
            let event = engine.stop();
            save_engine(&db, &engine)?;
            if let Some(Event::TimerStopped {
                session_type,
                elapsed_secs,
                ..
            }) = &event
            {
                // The in-memory transition stands even if the write fails;
                // the failure is surfaced, never swallowed.
                db.record_session(clock.today(), *session_type, *elapsed_secs, false)?;
            }
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Reset => {
            let event = engine.reset();
            save_engine(&db, &engine)?;
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Status => {
            let completed = engine.tick();
            save_engine(&db, &engine)?;
            if let Some(event) = &completed {
                record_completion(&db, &clock, event)?;
                if let Some(kind) = cue_for_event(event) {
                    cue_sink(&config).play(kind);
                }
            }
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            if let Some(event) = completed {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Watch { start } => {
            watch(db, config, clock, engine, start)?;
        }
    }

    Ok(())
}

fn print_event_or_snapshot(
    engine: &TimerEngine,
    event: Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
        None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
    }
    Ok(())
}

fn record_completion(
    db: &Database,
    clock: &Clock,
    event: &Event,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Event::IntervalCompleted {
        finished,
        duration_secs,
        ..
    } = event
    {
        db.record_session(clock.today(), *finished, *duration_secs, true)?;
    }
    Ok(())
}

/// The polling scheduler: tick on a short cadence while the countdown is
/// live, a relaxed one while idle, and redraw one status line per poll.
///
/// The loop is the single writer of the engine snapshot while it runs;
/// timer commands issued from other terminals are not picked up.
fn watch(
    db: Database,
    config: Config,
    clock: Clock,
    mut engine: TimerEngine,
    start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cue = cue_sink(&config);
    println!("watching timer -- {} (ctrl-c to leave)", clock.date_string());

    if start {
        if let Some(event) = engine.start() {
            if let Some(kind) = cue_for_event(&event) {
                cue.play(kind);
            }
            save_engine(&db, &engine)?;
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let period = if engine.state() == TimerState::Running {
                RUNNING_POLL
            } else {
                IDLE_POLL
            };
            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = &mut ctrl_c => break,
            }

            sync_today(&db, &mut engine, &clock)?;

            if let Some(event) = engine.tick() {
                record_completion(&db, &clock, &event)?;
                if let Some(kind) = cue_for_event(&event) {
                    cue.play(kind);
                }
                save_engine(&db, &engine)?;
                announce_completion(&event);
            }

            redraw(&engine, &clock)?;
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    println!();
    log::debug!("watch loop ended, persisting engine snapshot");
    save_engine(&db, &engine)?;
    Ok(())
}

fn announce_completion(event: &Event) {
    if let Event::IntervalCompleted { finished, next, .. } = event {
        println!("\ninterval completed: {finished}, next up: {next:?}");
    }
}

fn redraw(engine: &TimerEngine, clock: &Clock) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = engine.snapshot();
    if let Event::StateSnapshot {
        remaining_secs,
        status,
        progress,
        today_completed,
        cycle_count,
        ..
    } = snapshot
    {
        let filled = (progress * 20.0).round() as usize;
        let bar: String = "#".repeat(filled) + &"-".repeat(20 - filled.min(20));
        let mut stdout = std::io::stdout();
        write!(
            stdout,
            "\r{} {:<22} [{}] today {:>2}  cycle {:>2}  {}  ",
            format_mmss(remaining_secs),
            status,
            bar,
            today_completed,
            cycle_count,
            clock.time_string(),
        )?;
        stdout.flush()?;
    }
    Ok(())
}
