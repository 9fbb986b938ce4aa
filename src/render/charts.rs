use crate::aggregate::{DaySummary, WeekSummary};
use crate::error::AppError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five visual slots of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    CumulativeVa,
    DailyPeak,
    DailyKvah,
    Weekly,
    LiveGauge,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 5] = [
        ChartSlot::CumulativeVa,
        ChartSlot::DailyPeak,
        ChartSlot::DailyKvah,
        ChartSlot::Weekly,
        ChartSlot::LiveGauge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartSlot::CumulativeVa => "cumulative_va",
            ChartSlot::DailyPeak => "daily_peak",
            ChartSlot::DailyKvah => "daily_kvah",
            ChartSlot::Weekly => "weekly",
            ChartSlot::LiveGauge => "live_gauge",
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| AppError::UnknownChartSlot(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Gauge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub id: String,
    pub title: String,
    pub position: AxisPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    #[serde(default)]
    pub fill: bool,
}

impl Series {
    fn new(name: &str, values: Vec<f64>, color: &str) -> Self {
        Self {
            name: name.to_string(),
            values,
            color: color.to_string(),
            axis: None,
            fill: false,
        }
    }

    fn on_axis(mut self, axis: &str) -> Self {
        self.axis = Some(axis.to_string());
        self
    }

    fn filled(mut self) -> Self {
        self.fill = true;
        self
    }
}

/// Everything a charting front end needs to draw one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub axes: Vec<Axis>,
}

impl ChartSpec {
    /// Every series carries one value per label.
    pub fn is_consistent(&self) -> bool {
        self.series.iter().all(|s| s.values.len() == self.labels.len())
    }
}

fn left_axis(title: &str) -> Axis {
    Axis {
        id: "y".into(),
        title: title.into(),
        position: AxisPosition::Left,
    }
}

fn time_labels(day: &DaySummary, tz: &Tz) -> Vec<String> {
    day.points
        .iter()
        .map(|p| p.timestamp.with_timezone(tz).to_rfc3339())
        .collect()
}

pub fn cumulative_va_chart(day: &DaySummary, tz: &Tz) -> ChartSpec {
    let (l1, l2): (Vec<f64>, Vec<f64>) = day
        .points
        .iter()
        .map(|p| (p.cumulative_phase1_apparent, p.cumulative_phase2_apparent))
        .unzip();

    ChartSpec {
        kind: ChartKind::Line,
        title: "Cumulative VA".into(),
        labels: time_labels(day, tz),
        series: vec![
            Series::new("L1 VA Cumulative", l1, "blue"),
            Series::new("L2 VA Cumulative", l2, "green"),
        ],
        axes: vec![left_axis("Cumulative VA")],
    }
}

pub fn daily_peak_chart(day: &DaySummary) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Daily Peak".into(),
        labels: vec!["L1 Peak".into(), "L2 Peak".into()],
        series: vec![Series::new(
            "Daily Peak Current",
            vec![day.peak_phase1_current, day.peak_phase2_current],
            "#007bff",
        )],
        axes: vec![left_axis("Peak A")],
    }
}

pub fn daily_kvah_chart(day: &DaySummary, tz: &Tz) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Daily kVAh".into(),
        labels: time_labels(day, tz),
        series: vec![Series::new(
            "Daily kVAh",
            day.points.iter().map(|p| p.daily_energy).collect(),
            "purple",
        )
        .filled()],
        axes: vec![left_axis("kVAh")],
    }
}

pub fn weekly_chart(week: &WeekSummary) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Weekly Statistics".into(),
        labels: week.iter().map(|d| d.date.format("%Y-%m-%d").to_string()).collect(),
        series: vec![
            Series::new(
                "Max Daily kVAh",
                week.iter().map(|d| d.max_daily_energy).collect(),
                "#ffc107",
            )
            .on_axis("y"),
            Series::new(
                "L1 Peak VA",
                week.iter().map(|d| d.max_phase1_apparent).collect(),
                "#dc3545",
            )
            .on_axis("y1"),
            Series::new(
                "L2 Peak VA",
                week.iter().map(|d| d.max_phase2_apparent).collect(),
                "#17a2b8",
            )
            .on_axis("y1"),
        ],
        axes: vec![
            left_axis("Max Daily kVAh"),
            Axis {
                id: "y1".into(),
                title: "Peak VA".into(),
                position: AxisPosition::Right,
            },
        ],
    }
}

/// Half-doughnut gauge: used share against the configured full scale.
pub fn live_gauge_chart(value: f64, max_va: f64) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Gauge,
        title: "Live L1 VA".into(),
        labels: vec!["Used VA".into(), "Remaining".into()],
        series: vec![Series::new(
            "L1 VA",
            vec![value, (max_va - value).max(0.0)],
            "#007bff",
        )],
        axes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_day, aggregate_week};
    use crate::readings::Reading;
    use chrono::{TimeZone, Utc};

    fn readings() -> Vec<Reading> {
        (0..4)
            .map(|i| Reading {
                timestamp: Some(Utc.with_ymd_and_hms(2025, 7, 4, i, 0, 0).unwrap()),
                phase1_apparent: 10.0,
                phase2_apparent: 5.0,
                daily_energy: f64::from(i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_slot_round_trip_through_str() {
        for slot in ChartSlot::ALL {
            assert_eq!(slot.as_str().parse::<ChartSlot>().unwrap(), slot);
        }
        assert!(matches!(
            "pie".parse::<ChartSlot>(),
            Err(AppError::UnknownChartSlot(_))
        ));
    }

    #[test]
    fn test_slot_serde_matches_as_str() {
        let json = serde_json::to_string(&ChartSlot::LiveGauge).unwrap();
        assert_eq!(json, "\"live_gauge\"");
    }

    #[test]
    fn test_series_match_labels() {
        let r = readings();
        let day = aggregate_day(&r);
        let week = aggregate_week(&r, &chrono_tz::UTC);

        let specs = [
            cumulative_va_chart(&day, &chrono_tz::UTC),
            daily_peak_chart(&day),
            daily_kvah_chart(&day, &chrono_tz::UTC),
            weekly_chart(&week),
            live_gauge_chart(120.0, 500.0),
        ];
        assert!(specs.iter().all(ChartSpec::is_consistent));
    }

    #[test]
    fn test_cumulative_labels_are_local_time() {
        let day = aggregate_day(&readings());
        let spec = cumulative_va_chart(&day, &chrono_tz::Europe::Stockholm);
        assert_eq!(spec.labels[0], "2025-07-04T02:00:00+02:00");
        assert_eq!(spec.series[0].values, vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_gauge_remaining_never_negative() {
        let spec = live_gauge_chart(750.0, 500.0);
        assert_eq!(spec.series[0].values, vec![750.0, 0.0]);
    }

    #[test]
    fn test_weekly_chart_uses_dual_axes() {
        let week = aggregate_week(&readings(), &chrono_tz::UTC);
        let spec = weekly_chart(&week);
        assert_eq!(spec.labels, vec!["2025-07-04"]);
        assert_eq!(spec.series[0].axis.as_deref(), Some("y"));
        assert_eq!(spec.series[1].axis.as_deref(), Some("y1"));
        assert_eq!(spec.axes.len(), 2);
    }
}
