//! SQLite-based session storage and aggregate queries.
//!
//! The `sessions` table is an append-only log: every start-to-stop or
//! start-to-completion transition inserts exactly one row, and no code path
//! updates or deletes a row afterwards. Aggregates only ever count rows
//! with `completed = 1`; abandoned attempts stay visible in raw storage.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clock::{date_key, parse_date_key};
use crate::error::{CoreError, DatabaseError, ValidationError};
use crate::timer::SessionType;

/// One row of the daily aggregate: per-type count and summed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatRow {
    pub session_type: SessionType,
    pub count: u64,
    pub total_secs: u64,
}

/// One row of the weekly aggregate: per-date, per-type completion count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStatRow {
    pub date: NaiveDate,
    pub session_type: SessionType,
    pub count: u64,
}

/// SQLite database holding the session history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/tomatick.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = super::data_dir()?.join("tomatick.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    date         TEXT NOT NULL,
                    session_type TEXT NOT NULL,
                    duration     INTEGER NOT NULL,
                    completed    INTEGER NOT NULL,
                    timestamp    DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
                CREATE INDEX IF NOT EXISTS idx_sessions_date_type
                    ON sessions(date, session_type);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Append one session attempt to the log.
    ///
    /// `duration_secs` is the time actually spent: the full configured
    /// length when completed naturally, the partial elapsed time when
    /// stopped early.
    ///
    /// # Errors
    /// Returns an error if the insert fails. The caller's in-memory timer
    /// transition has already happened and stands either way.
    pub fn record_session(
        &self,
        date: NaiveDate,
        session_type: SessionType,
        duration_secs: u64,
        completed: bool,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (date, session_type, duration, completed)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                date_key(date),
                session_type.as_str(),
                duration_secs,
                completed as i64,
            ],
        )?;
        log::debug!(
            "recorded {session_type} session: {duration_secs}s, completed={completed}"
        );
        Ok(self.conn.last_insert_rowid())
    }

    /// Count of completed work sessions for one date. Seeds the engine's
    /// cached today-count at startup and on date rollover.
    pub fn completed_work_today(&self, date: NaiveDate) -> Result<u64, DatabaseError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions
             WHERE date = ?1 AND completed = 1 AND session_type = 'work'",
            params![date_key(date)],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }

    /// Per-type count and summed duration of completed sessions for one date.
    pub fn daily_stats(&self, date: NaiveDate) -> Result<Vec<DailyStatRow>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT session_type, COUNT(*), COALESCE(SUM(duration), 0)
             FROM sessions
             WHERE date = ?1 AND completed = 1
             GROUP BY session_type",
        )?;

        let rows = stmt.query_map(params![date_key(date)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (type_str, count, total_secs) = row?;
            let Some(session_type) = SessionType::parse(&type_str) else {
                log::warn!("skipping session row with unknown type '{type_str}'");
                continue;
            };
            out.push(DailyStatRow {
                session_type,
                count,
                total_secs,
            });
        }
        Ok(out)
    }

    /// Per-date, per-type completion counts over an inclusive date window,
    /// ordered by date ascending.
    pub fn weekly_stats(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeeklyStatRow>, DatabaseError> {
        if end < start {
            return Err(DatabaseError::QueryFailed(
                ValidationError::InvalidDateRange { start, end }.to_string(),
            ));
        }
        let mut stmt = self.conn.prepare(
            "SELECT date, session_type, COUNT(*)
             FROM sessions
             WHERE date >= ?1 AND date <= ?2 AND completed = 1
             GROUP BY date, session_type
             ORDER BY date",
        )?;

        let rows = stmt.query_map(params![date_key(start), date_key(end)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (date_str, type_str, count) = row?;
            let (Some(date), Some(session_type)) =
                (parse_date_key(&date_str), SessionType::parse(&type_str))
            else {
                log::warn!("skipping malformed session row ({date_str}, {type_str})");
                continue;
            };
            out.push(WeeklyStatRow {
                date,
                session_type,
                count,
            });
        }
        Ok(out)
    }

    /// Total number of rows in the raw log, completed or not.
    pub fn session_count(&self) -> Result<u64, DatabaseError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(count)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn record_and_count_completed_work() {
        let db = Database::open_memory().unwrap();
        db.record_session(day(7), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(7), SessionType::Work, 600, false)
            .unwrap();
        db.record_session(day(7), SessionType::Break, 300, true)
            .unwrap();
        db.record_session(day(6), SessionType::Work, 1500, true)
            .unwrap();

        assert_eq!(db.completed_work_today(day(7)).unwrap(), 1);
        assert_eq!(db.completed_work_today(day(6)).unwrap(), 1);
        assert_eq!(db.completed_work_today(day(5)).unwrap(), 0);
    }

    #[test]
    fn daily_stats_exclude_incomplete_rows() {
        let db = Database::open_memory().unwrap();
        db.record_session(day(7), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(7), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(7), SessionType::Work, 444, false)
            .unwrap();
        db.record_session(day(7), SessionType::Break, 300, true)
            .unwrap();

        let stats = db.daily_stats(day(7)).unwrap();
        assert_eq!(stats.len(), 2);
        let work = stats
            .iter()
            .find(|r| r.session_type == SessionType::Work)
            .unwrap();
        assert_eq!(work.count, 2);
        assert_eq!(work.total_secs, 3000);
        let brk = stats
            .iter()
            .find(|r| r.session_type == SessionType::Break)
            .unwrap();
        assert_eq!(brk.count, 1);
        assert_eq!(brk.total_secs, 300);

        // The abandoned attempt still exists in the raw log.
        assert_eq!(db.session_count().unwrap(), 4);
    }

    #[test]
    fn weekly_stats_window_is_inclusive_and_ordered() {
        let db = Database::open_memory().unwrap();
        db.record_session(day(1), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(4), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(4), SessionType::Break, 300, true)
            .unwrap();
        db.record_session(day(7), SessionType::Work, 1500, true)
            .unwrap();
        db.record_session(day(7), SessionType::Work, 120, false)
            .unwrap();
        // Outside the window.
        db.record_session(NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(), SessionType::Work, 1500, true)
            .unwrap();

        let rows = db.weekly_stats(day(1), day(7)).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(4), day(4), day(7)]);
        assert!(rows.iter().all(|r| r.count >= 1));
        assert_eq!(
            rows.iter()
                .filter(|r| r.session_type == SessionType::Work)
                .map(|r| r.count)
                .sum::<u64>(),
            3
        );
    }

    #[test]
    fn weekly_stats_reject_inverted_window() {
        let db = Database::open_memory().unwrap();
        assert!(db.weekly_stats(day(7), day(1)).is_err());
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("engine").unwrap().is_none());
        db.kv_set("engine", "{}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().unwrap(), "{}");
    }
}
