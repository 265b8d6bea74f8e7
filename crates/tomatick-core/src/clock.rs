//! Wall-clock provider with a configurable display timezone.
//!
//! The session date key is always taken from this clock at insertion time,
//! so "today" follows the configured zone rather than a hard-coded region.

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// Wall clock, either the system local zone or a fixed IANA zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    tz: Option<Tz>,
}

impl Clock {
    /// System local time.
    pub fn local() -> Self {
        Self { tz: None }
    }

    /// Fixed zone by IANA name, e.g. `"America/Sao_Paulo"`.
    pub fn with_timezone(name: &str) -> Result<Self, ConfigError> {
        let tz = name.parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
            key: "clock.timezone".into(),
            message: format!("unknown timezone '{name}'"),
        })?;
        Ok(Self { tz: Some(tz) })
    }

    /// From an optional configured name; `None` means system local.
    pub fn from_config(name: Option<&str>) -> Result<Self, ConfigError> {
        match name {
            Some(name) => Self::with_timezone(name),
            None => Ok(Self::local()),
        }
    }

    /// Calendar date used as the session grouping key.
    pub fn today(&self) -> NaiveDate {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }

    /// `HH:MM:SS` wall-clock display string.
    pub fn time_string(&self) -> String {
        self.format("%H:%M:%S")
    }

    /// `DD/MM/YYYY` wall-clock date display string.
    pub fn date_string(&self) -> String {
        self.format("%d/%m/%Y")
    }

    fn format(&self, fmt: &str) -> String {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).format(fmt).to_string(),
            None => Local::now().format(fmt).to_string(),
        }
    }
}

/// Inclusive 7-day window ending at `end`: `(end - 6 days, end)`.
pub fn week_window(end: NaiveDate) -> (NaiveDate, NaiveDate) {
    (end - chrono::Duration::days(6), end)
}

/// Format a date the way the sessions table stores it.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored `YYYY-MM-DD` key back to a date.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
