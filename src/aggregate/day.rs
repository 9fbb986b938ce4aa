use crate::readings::Reading;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub timestamp: DateTime<Utc>,
    pub cumulative_phase1_apparent: f64,
    pub cumulative_phase2_apparent: f64,
    pub daily_energy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySummary {
    pub points: Vec<DayPoint>,
    /// Max of the phase-1 peak-current field over the day
    pub peak_phase1_current: f64,
    /// Max of the phase-2 peak-current field over the day
    pub peak_phase2_current: f64,
}

/// Running per-phase apparent-power totals plus same-day peak currents.
///
/// Input is sorted by timestamp first; readings without a timestamp are
/// skipped. An empty day yields no points and zero peaks.
pub fn aggregate_day(readings: &[Reading]) -> DaySummary {
    let mut ordered: Vec<(DateTime<Utc>, &Reading)> = readings
        .iter()
        .filter_map(|r| r.timestamp.map(|ts| (ts, r)))
        .collect();
    ordered.sort_by_key(|(ts, _)| *ts);

    if ordered.is_empty() {
        return DaySummary::default();
    }

    let mut cumulative_phase1 = 0.0;
    let mut cumulative_phase2 = 0.0;
    let mut peak_phase1 = f64::NEG_INFINITY;
    let mut peak_phase2 = f64::NEG_INFINITY;
    let mut points = Vec::with_capacity(ordered.len());

    for (timestamp, r) in ordered {
        cumulative_phase1 += r.phase1_apparent;
        cumulative_phase2 += r.phase2_apparent;
        peak_phase1 = peak_phase1.max(r.phase1_peak_current);
        peak_phase2 = peak_phase2.max(r.phase2_peak_current);

        points.push(DayPoint {
            timestamp,
            cumulative_phase1_apparent: cumulative_phase1,
            cumulative_phase2_apparent: cumulative_phase2,
            daily_energy: r.daily_energy,
        });
    }

    DaySummary {
        points,
        peak_phase1_current: peak_phase1,
        peak_phase2_current: peak_phase2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn reading(minute: u32, l1: f64, l2: f64, daily: f64) -> Reading {
        Reading {
            timestamp: Some(Utc.with_ymd_and_hms(2025, 7, 4, 0, minute, 0).unwrap()),
            phase1_apparent: l1,
            phase2_apparent: l2,
            daily_energy: daily,
            ..Default::default()
        }
    }

    fn series(summary: &DaySummary) -> (Vec<f64>, Vec<f64>) {
        summary
            .points
            .iter()
            .map(|p| (p.cumulative_phase1_apparent, p.cumulative_phase2_apparent))
            .unzip()
    }

    #[test]
    fn test_cumulative_series() {
        let summary = aggregate_day(&[reading(0, 10.0, 5.0, 1.0), reading(10, 15.0, 5.0, 2.0)]);

        let (l1, l2) = series(&summary);
        assert_eq!(l1, vec![10.0, 25.0]);
        assert_eq!(l2, vec![5.0, 10.0]);
        assert_eq!(
            summary.points.iter().map(|p| p.daily_energy).collect::<Vec<_>>(),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn test_sorts_before_accumulating() {
        let summary = aggregate_day(&[
            reading(20, 1.0, 0.0, 3.0),
            reading(0, 100.0, 0.0, 1.0),
            reading(10, 10.0, 0.0, 2.0),
        ]);

        let (l1, _) = series(&summary);
        assert_eq!(l1, vec![100.0, 110.0, 111.0]);
        assert!(summary
            .points
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_cumulative_is_non_decreasing_for_non_negative_input() {
        let readings: Vec<Reading> = (0..50)
            .map(|i| {
                let v = f64::from((i * 37) % 11);
                reading(i, v, v * 0.5, 0.0)
            })
            .collect();
        let summary = aggregate_day(&readings);

        for w in summary.points.windows(2) {
            assert!(w[1].cumulative_phase1_apparent >= w[0].cumulative_phase1_apparent);
            assert!(w[1].cumulative_phase2_apparent >= w[0].cumulative_phase2_apparent);
        }
    }

    #[test]
    fn test_peak_uses_peak_current_not_apparent() {
        let mut a = reading(0, 900.0, 800.0, 0.0);
        a.phase1_peak_current = 3.0;
        a.phase2_peak_current = 7.5;
        let mut b = reading(5, 10.0, 10.0, 0.0);
        b.phase1_peak_current = 4.25;
        b.phase2_peak_current = 2.0;

        let summary = aggregate_day(&[a, b]);
        assert_eq!(summary.peak_phase1_current, 4.25);
        assert_eq!(summary.peak_phase2_current, 7.5);
    }

    #[test]
    fn test_empty_day() {
        let summary = aggregate_day(&[]);
        assert!(summary.points.is_empty());
        assert_eq!(summary.peak_phase1_current, 0.0);
        assert_eq!(summary.peak_phase2_current, 0.0);
    }

    #[test]
    fn test_untimestamped_readings_are_skipped() {
        let orphan = Reading {
            phase1_apparent: 1000.0,
            phase1_peak_current: 99.0,
            ..Default::default()
        };
        let summary = aggregate_day(&[orphan, reading(0, 1.0, 2.0, 0.0)]);

        assert_eq!(summary.points.len(), 1);
        assert_eq!(summary.points[0].cumulative_phase1_apparent, 1.0);
        assert_eq!(summary.peak_phase1_current, 0.0);
    }
}
