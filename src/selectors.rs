use crate::filter::iso_week_bounds;
use crate::readings::ReadingSet;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOption {
    pub value: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekOption {
    /// Monday of the week
    pub value: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// Selectable days and weeks, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectorCatalogue {
    pub days: Vec<DayOption>,
    pub weeks: Vec<WeekOption>,
}

impl SelectorCatalogue {
    pub fn from_readings(readings: &ReadingSet, tz: &Tz) -> Self {
        let dates: BTreeSet<NaiveDate> = readings
            .iter()
            .filter_map(|r| r.local_date(tz))
            .collect();
        let mondays: BTreeSet<NaiveDate> =
            dates.iter().map(|d| iso_week_bounds(*d).0).collect();

        let days = dates
            .into_iter()
            .rev()
            .map(|value| DayOption {
                value,
                label: value.format("%B %-d, %Y").to_string(),
            })
            .collect();

        let weeks = mondays
            .into_iter()
            .rev()
            .map(|monday| {
                let (_, sunday) = iso_week_bounds(monday);
                WeekOption {
                    value: monday,
                    end: sunday,
                    label: format!(
                        "Week of {} - {}",
                        monday.format("%b %-d"),
                        sunday.format("%b %-d, %Y")
                    ),
                }
            })
            .collect();

        Self { days, weeks }
    }

    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.value)
    }

    pub fn latest_week(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readings::Reading;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(m: u32, d: u32) -> Reading {
        Reading {
            timestamp: Some(Utc.with_ymd_and_hms(2025, m, d, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_days_and_weeks_descending() {
        let set = ReadingSet::new(vec![
            at(7, 1),
            at(7, 4),
            at(7, 1),
            at(7, 8),
            Reading::default(),
        ]);
        let catalogue = SelectorCatalogue::from_readings(&set, &chrono_tz::UTC);

        let days: Vec<NaiveDate> = catalogue.days.iter().map(|d| d.value).collect();
        assert_eq!(days, vec![date(7, 8), date(7, 4), date(7, 1)]);

        let weeks: Vec<NaiveDate> = catalogue.weeks.iter().map(|w| w.value).collect();
        assert_eq!(weeks, vec![date(7, 7), date(6, 30)]);

        assert_eq!(catalogue.latest_day(), Some(date(7, 8)));
        assert_eq!(catalogue.latest_week(), Some(date(7, 7)));
    }

    #[test]
    fn test_labels() {
        let set = ReadingSet::new(vec![at(7, 4)]);
        let catalogue = SelectorCatalogue::from_readings(&set, &chrono_tz::UTC);

        assert_eq!(catalogue.days[0].label, "July 4, 2025");
        assert_eq!(catalogue.weeks[0].label, "Week of Jun 30 - Jul 6, 2025");
        assert_eq!(catalogue.weeks[0].end, date(7, 6));
    }

    #[test]
    fn test_empty_set() {
        let catalogue = SelectorCatalogue::from_readings(&ReadingSet::default(), &chrono_tz::UTC);
        assert!(catalogue.days.is_empty());
        assert!(catalogue.latest_week().is_none());
    }
}
