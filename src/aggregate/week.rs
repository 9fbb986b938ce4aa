use crate::readings::Reading;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub max_daily_energy: f64,
    /// Largest phase-1 apparent-power sample of the day
    pub max_phase1_apparent: f64,
    /// Largest phase-2 apparent-power sample of the day
    pub max_phase2_apparent: f64,
}

impl WeekDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            max_daily_energy: 0.0,
            max_phase1_apparent: 0.0,
            max_phase2_apparent: 0.0,
        }
    }
}

pub type WeekSummary = Vec<WeekDay>;

/// One row per observed local calendar day, ascending. Days without
/// readings are not synthesized.
pub fn aggregate_week(readings: &[Reading], tz: &Tz) -> WeekSummary {
    let mut days: BTreeMap<NaiveDate, WeekDay> = BTreeMap::new();

    for r in readings {
        let Some(date) = r.local_date(tz) else {
            continue;
        };
        let day = days.entry(date).or_insert_with(|| WeekDay::empty(date));
        day.max_daily_energy = day.max_daily_energy.max(r.daily_energy);
        day.max_phase1_apparent = day.max_phase1_apparent.max(r.phase1_apparent);
        day.max_phase2_apparent = day.max_phase2_apparent.max(r.phase2_apparent);
    }

    days.into_values().collect()
}
