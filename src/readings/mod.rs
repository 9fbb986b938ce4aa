pub mod normalize;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

pub use normalize::{normalize, normalize_all, parse_timestamp};

/// One normalized sample from the metering source.
///
/// `timestamp` is `None` when the source value could not be parsed; such
/// readings stay in the set but never match a filter or feed an aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: Option<DateTime<Utc>>,
    pub phase1_current: f64,
    pub phase1_apparent: f64,
    pub phase2_current: f64,
    pub phase2_apparent: f64,
    pub phase1_peak_current: f64,
    pub phase2_peak_current: f64,
    pub total_apparent: f64,
    /// Cumulative kVAh
    pub total_energy: f64,
    /// kVAh for the reading's calendar day so far
    pub daily_energy: f64,
}

impl Reading {
    /// Calendar date of the reading in the dashboard zone.
    pub fn local_date(&self, tz: &Tz) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.with_timezone(tz).date_naive())
    }
}

/// The in-memory cache of normalized readings.
///
/// Only ever replaced as a whole or cleared; callers get read access through
/// slices and queries.
#[derive(Debug, Clone, Default)]
pub struct ReadingSet {
    readings: Vec<Reading>,
}

impl ReadingSet {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Swap in a freshly fetched batch, returning the previous one.
    pub fn replace(&mut self, readings: Vec<Reading>) -> Vec<Reading> {
        std::mem::replace(&mut self.readings, readings)
    }

    pub fn clear(&mut self) {
        self.readings = Vec::new();
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Readings with a usable timestamp.
    pub fn timestamped(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter().filter(|r| r.timestamp.is_some())
    }

    /// The reading with the greatest timestamp.
    pub fn latest(&self) -> Option<&Reading> {
        self.timestamped().max_by_key(|r| r.timestamp)
    }

    /// Local date of the most recent reading.
    pub fn latest_date(&self, tz: &Tz) -> Option<NaiveDate> {
        self.latest().and_then(|r| r.local_date(tz))
    }
}
