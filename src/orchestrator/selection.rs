use crate::filter::{week_start, Filter};
use chrono::NaiveDate;

/// Where the active filter comes from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterSource {
    LastExplicit,
    RememberedDay,
    RememberedWeek,
    LatestDay,
}

const PRIORITY: [FilterSource; 4] = [
    FilterSource::LastExplicit,
    FilterSource::RememberedDay,
    FilterSource::RememberedWeek,
    FilterSource::LatestDay,
];

/// User selection state. Tracks the last explicit pick as well as the most
/// recent value of each selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    last_explicit: Option<Filter>,
    day: Option<NaiveDate>,
    week: Option<NaiveDate>,
}

impl Selection {
    pub fn record(&mut self, filter: Filter) {
        let filter = match filter {
            Filter::Day(date) => {
                self.day = Some(date);
                filter
            }
            Filter::Week(anchor) => {
                let monday = week_start(anchor);
                self.week = Some(monday);
                Filter::Week(monday)
            }
        };
        self.last_explicit = Some(filter);
    }

    /// Drop the explicit pick but keep the remembered selector values.
    pub fn forget_explicit(&mut self) {
        self.last_explicit = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn last_explicit(&self) -> Option<Filter> {
        self.last_explicit
    }

    /// Walk the priority list; `latest_day` is the newest date in the cache.
    pub fn resolve(&self, latest_day: Option<NaiveDate>) -> Option<Filter> {
        PRIORITY.iter().find_map(|source| match source {
            FilterSource::LastExplicit => self.last_explicit,
            FilterSource::RememberedDay => self.day.map(Filter::Day),
            FilterSource::RememberedWeek => self.week.map(Filter::Week),
            FilterSource::LatestDay => latest_day.map(Filter::Day),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn test_defaults_to_latest_day() {
        let selection = Selection::default();
        assert_eq!(selection.resolve(Some(date(8))), Some(Filter::Day(date(8))));
        assert_eq!(selection.resolve(None), None);
    }

    #[test]
    fn test_last_explicit_wins() {
        let mut selection = Selection::default();
        selection.record(Filter::Day(date(2)));
        selection.record(Filter::Week(date(9)));

        assert_eq!(
            selection.resolve(Some(date(20))),
            Some(Filter::Week(date(7)))
        );
    }

    #[test]
    fn test_day_beats_week_without_explicit() {
        let mut selection = Selection::default();
        selection.record(Filter::Week(date(9)));
        selection.record(Filter::Day(date(2)));
        selection.record(Filter::Week(date(16)));
        selection.forget_explicit();

        assert_eq!(selection.resolve(Some(date(20))), Some(Filter::Day(date(2))));
    }

    #[test]
    fn test_week_when_no_day_remembered() {
        let mut selection = Selection::default();
        selection.record(Filter::Week(date(3)));
        selection.forget_explicit();

        assert_eq!(
            selection.resolve(Some(date(20))),
            Some(Filter::Week(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()))
        );
    }

    #[test]
    fn test_clear_returns_to_default() {
        let mut selection = Selection::default();
        selection.record(Filter::Day(date(2)));
        selection.clear();

        assert_eq!(selection.last_explicit(), None);
        assert_eq!(selection.resolve(Some(date(5))), Some(Filter::Day(date(5))));
    }
}
