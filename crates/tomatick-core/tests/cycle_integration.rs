//! Integration tests for the full timer-to-storage cycle.
//!
//! Drives the engine with deterministic ticks and persists every emitted
//! session event the way the CLI does, then checks the aggregate views.

use chrono::NaiveDate;
use tomatick_core::{
    DailySummary, Database, Durations, Event, IntervalKind, SessionType, TimerEngine, TimerState,
    WeeklyReport,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

/// Persist an engine event the way the CLI command layer does.
fn persist(db: &Database, date: NaiveDate, event: &Event) {
    match event {
        Event::TimerStopped {
            session_type,
            elapsed_secs,
            ..
        } => {
            db.record_session(date, *session_type, *elapsed_secs, false)
                .unwrap();
        }
        Event::IntervalCompleted {
            finished,
            duration_secs,
            ..
        } => {
            db.record_session(date, *finished, *duration_secs, true)
                .unwrap();
        }
        _ => {}
    }
}

/// Start the engine and tick once per second until completion.
fn complete_interval(engine: &mut TimerEngine, db: &Database, start_ms: u64) -> u64 {
    engine.start_at(start_ms).expect("engine should be idle");
    let mut now = start_ms;
    loop {
        now += 1000;
        if let Some(event) = engine.tick_at(now) {
            persist(db, today(), &event);
            return now;
        }
    }
}

#[test]
fn four_work_intervals_grant_a_long_break() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(Durations::from_minutes(25, 5, 15));
    let mut now = 0;

    for completed in 1..=4u64 {
        // Work interval.
        now = complete_interval(&mut engine, &db, now);
        assert_eq!(engine.cycle_count(), completed);
        if completed == 4 {
            assert_eq!(engine.kind(), IntervalKind::LongBreak);
            assert_eq!(engine.total_secs(), 15 * 60);
        } else {
            assert_eq!(engine.kind(), IntervalKind::ShortBreak);
            assert_eq!(engine.total_secs(), 5 * 60);
        }
        // The granted break.
        now = complete_interval(&mut engine, &db, now);
        assert_eq!(engine.kind(), IntervalKind::Work);
    }

    // 4 work + 4 break completions, everything completed.
    let summary = DailySummary::from_rows(today(), &db.daily_stats(today()).unwrap());
    assert_eq!(summary.work.count, 4);
    assert_eq!(summary.work.total_secs, 4 * 25 * 60);
    assert_eq!(summary.breaks.count, 4);
    assert_eq!(summary.breaks.total_secs, 3 * 5 * 60 + 15 * 60);
    assert_eq!(db.completed_work_today(today()).unwrap(), 4);
}

#[test]
fn stopped_interval_is_logged_but_invisible_to_aggregates() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(Durations::from_minutes(25, 5, 15));

    engine.start_at(0).unwrap();
    engine.tick_at(90_000);
    let event = engine.stop_at(90_000).expect("stop while running");
    persist(&db, today(), &event);

    match event {
        Event::TimerStopped {
            session_type,
            elapsed_secs,
            ..
        } => {
            assert_eq!(session_type, SessionType::Work);
            assert_eq!(elapsed_secs, 90);
        }
        other => panic!("expected TimerStopped, got {other:?}"),
    }

    // Stop resets to a fresh work interval and the engine is startable again.
    assert_eq!(engine.state(), TimerState::Idle);
    assert_eq!(engine.kind(), IntervalKind::Work);
    assert!(engine.start_at(100_000).is_some());

    // Raw log has the row; every aggregate ignores it.
    assert_eq!(db.session_count().unwrap(), 1);
    assert_eq!(db.completed_work_today(today()).unwrap(), 0);
    let summary = DailySummary::from_rows(today(), &db.daily_stats(today()).unwrap());
    assert!(summary.is_empty());
    let (start, end) = tomatick_core::clock::week_window(today());
    let report = WeeklyReport::from_rows(start, end, &db.weekly_stats(start, end).unwrap());
    assert!(report.is_empty());
}

#[test]
fn reset_writes_nothing() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(Durations::default());

    engine.start_at(0).unwrap();
    engine.tick_at(120_000);
    let event = engine.reset().unwrap();
    persist(&db, today(), &event);

    assert!(matches!(event, Event::TimerReset { .. }));
    assert_eq!(db.session_count().unwrap(), 0);
}

#[test]
fn weekly_report_covers_the_inclusive_window() {
    let db = Database::open_memory().unwrap();
    let (start, end) = tomatick_core::clock::week_window(today());

    db.record_session(start, SessionType::Work, 1500, true)
        .unwrap();
    db.record_session(end, SessionType::Work, 1500, true).unwrap();
    db.record_session(end, SessionType::Break, 300, true).unwrap();
    // One day before the window: excluded.
    db.record_session(start - chrono::Duration::days(1), SessionType::Work, 1500, true)
        .unwrap();

    let report = WeeklyReport::from_rows(start, end, &db.weekly_stats(start, end).unwrap());
    assert_eq!(report.days.len(), 7);
    assert_eq!(report.days[0].work, 1);
    assert_eq!(report.days[6].work, 1);
    assert_eq!(report.days[6].breaks, 1);
    assert_eq!(report.total_work(), 2);
}

#[test]
fn engine_snapshot_survives_kv_persistence() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(Durations::from_minutes(25, 5, 15));
    engine.start_at(0).unwrap();
    engine.tick_at(65_000);
    engine.toggle_pause_at(65_000).unwrap();

    let json = serde_json::to_string(&engine).unwrap();
    db.kv_set("timer_engine", &json).unwrap();

    let loaded: TimerEngine =
        serde_json::from_str(&db.kv_get("timer_engine").unwrap().unwrap()).unwrap();
    assert_eq!(loaded.state(), TimerState::Paused);
    assert_eq!(loaded.remaining_secs(), engine.remaining_secs());
    assert_eq!(loaded.kind(), engine.kind());
}

#[test]
fn on_disk_database_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tomatick.db");

    {
        let db = Database::open_at(&path).unwrap();
        db.record_session(today(), SessionType::Work, 1500, true)
            .unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.completed_work_today(today()).unwrap(), 1);
}
