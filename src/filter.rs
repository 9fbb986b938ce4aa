use crate::error::{AppError, Result};
use crate::readings::Reading;
use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A day or week selection, as picked in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "lowercase")]
pub enum Filter {
    Day(NaiveDate),
    /// Any date inside the week; normalized to its Monday on application.
    Week(NaiveDate),
}

impl Filter {
    pub fn apply(&self, readings: &[Reading], tz: &Tz) -> Vec<Reading> {
        match self {
            Filter::Day(date) => filter_by_day(readings, *date, tz),
            Filter::Week(anchor) => filter_by_week(readings, *anchor, tz),
        }
    }

    /// The date that anchors the weekly chart for this selection.
    pub fn anchor(&self) -> NaiveDate {
        match self {
            Filter::Day(date) | Filter::Week(date) => *date,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Day(date) => write!(f, "day {}", date),
            Filter::Week(anchor) => write!(f, "week starting {}", week_start(*anchor)),
        }
    }
}

/// Parse a selector value in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Monday and Sunday of the ISO week containing `anchor`, both inclusive.
pub fn iso_week_bounds(anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = week_start(anchor);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
    (monday, sunday)
}

pub fn filter_by_day(readings: &[Reading], date: NaiveDate, tz: &Tz) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| r.local_date(tz) == Some(date))
        .cloned()
        .collect()
}

pub fn filter_by_week(readings: &[Reading], anchor: NaiveDate, tz: &Tz) -> Vec<Reading> {
    let (monday, sunday) = iso_week_bounds(anchor);
    readings
        .iter()
        .filter(|r| {
            r.local_date(tz)
                .map(|d| d >= monday && d <= sunday)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
