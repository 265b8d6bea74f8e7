//! Aggregate views over the session history.
//!
//! Shapes the raw grouped rows from [`Database`](crate::Database) into the
//! structures the presentation layer renders: a per-type daily summary and
//! a zero-filled 7-day report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::{DailyStatRow, WeeklyStatRow};
use crate::timer::{format_hm, SessionType};

/// Count and summed duration for one session type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub count: u64,
    pub total_secs: u64,
}

impl TypeTotals {
    /// `"Xh Ym"` rendering of the summed duration.
    pub fn duration_display(&self) -> String {
        format_hm(self.total_secs)
    }
}

/// Completed-session totals for a single date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub work: TypeTotals,
    pub breaks: TypeTotals,
}

impl DailySummary {
    pub fn from_rows(date: NaiveDate, rows: &[DailyStatRow]) -> Self {
        let mut summary = Self {
            date,
            work: TypeTotals::default(),
            breaks: TypeTotals::default(),
        };
        for row in rows {
            let totals = match row.session_type {
                SessionType::Work => &mut summary.work,
                SessionType::Break => &mut summary.breaks,
            };
            totals.count += row.count;
            totals.total_secs += row.total_secs;
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.work.count == 0 && self.breaks.count == 0
    }
}

/// Per-day completion counts within the weekly window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounts {
    pub date: NaiveDate,
    pub work: u64,
    pub breaks: u64,
}

/// Completion counts over an inclusive date window, one entry per day in
/// ascending order. Days without completed sessions appear with zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayCounts>,
}

impl WeeklyReport {
    pub fn from_rows(start: NaiveDate, end: NaiveDate, rows: &[WeeklyStatRow]) -> Self {
        let mut days = Vec::new();
        let mut date = start;
        while date <= end {
            let mut counts = DayCounts {
                date,
                work: 0,
                breaks: 0,
            };
            for row in rows.iter().filter(|r| r.date == date) {
                match row.session_type {
                    SessionType::Work => counts.work += row.count,
                    SessionType::Break => counts.breaks += row.count,
                }
            }
            days.push(counts);
            date = date + chrono::Duration::days(1);
        }
        Self { start, end, days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.work == 0 && d.breaks == 0)
    }

    pub fn total_work(&self) -> u64 {
        self.days.iter().map(|d| d.work).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn daily_summary_splits_by_type() {
        let rows = vec![
            DailyStatRow {
                session_type: SessionType::Work,
                count: 3,
                total_secs: 4500,
            },
            DailyStatRow {
                session_type: SessionType::Break,
                count: 2,
                total_secs: 600,
            },
        ];
        let summary = DailySummary::from_rows(day(7), &rows);
        assert_eq!(summary.work, TypeTotals { count: 3, total_secs: 4500 });
        assert_eq!(summary.breaks, TypeTotals { count: 2, total_secs: 600 });
        assert_eq!(summary.work.duration_display(), "1h 15m");
        assert!(!summary.is_empty());
    }

    #[test]
    fn empty_daily_summary() {
        let summary = DailySummary::from_rows(day(7), &[]);
        assert!(summary.is_empty());
        assert_eq!(summary.work.duration_display(), "0h 0m");
    }

    #[test]
    fn weekly_report_zero_fills_missing_days() {
        let rows = vec![
            WeeklyStatRow {
                date: day(2),
                session_type: SessionType::Work,
                count: 4,
            },
            WeeklyStatRow {
                date: day(2),
                session_type: SessionType::Break,
                count: 3,
            },
            WeeklyStatRow {
                date: day(6),
                session_type: SessionType::Work,
                count: 1,
            },
        ];
        let report = WeeklyReport::from_rows(day(1), day(7), &rows);
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0].date, day(1));
        assert_eq!(report.days[6].date, day(7));
        assert_eq!(report.days[1], DayCounts { date: day(2), work: 4, breaks: 3 });
        assert_eq!(report.days[5], DayCounts { date: day(6), work: 1, breaks: 0 });
        assert_eq!(report.days[3], DayCounts { date: day(4), work: 0, breaks: 0 });
        assert_eq!(report.total_work(), 5);
    }

    #[test]
    fn weekly_report_empty_window() {
        let report = WeeklyReport::from_rows(day(1), day(7), &[]);
        assert_eq!(report.days.len(), 7);
        assert!(report.is_empty());
    }
}
