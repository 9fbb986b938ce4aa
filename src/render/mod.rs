pub mod charts;
pub mod registry;

pub use charts::{ChartKind, ChartSlot, ChartSpec, Series};
pub use registry::{ChartInstance, ChartRegistry};

use crate::aggregate::{DaySummary, WeekSummary};
use crate::filter::iso_week_bounds;
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Prepared data for one full redraw.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub day: &'a DaySummary,
    pub week: &'a WeekSummary,
    /// Phase-1 apparent power of the most recent reading in view
    pub gauge_value: f64,
}

/// Redraw every slot from `frame`, replacing existing instances.
pub fn draw(registry: &mut ChartRegistry, frame: &Frame<'_>, tz: &Tz, gauge_max_va: f64) {
    registry.replace(
        ChartSlot::CumulativeVa,
        charts::cumulative_va_chart(frame.day, tz),
    );
    registry.replace(ChartSlot::DailyPeak, charts::daily_peak_chart(frame.day));
    registry.replace(ChartSlot::DailyKvah, charts::daily_kvah_chart(frame.day, tz));
    registry.replace(
        ChartSlot::LiveGauge,
        charts::live_gauge_chart(frame.gauge_value, gauge_max_va),
    );
    registry.replace(ChartSlot::Weekly, charts::weekly_chart(frame.week));
}

/// "(Week of Jun 30, 2025 - Jul 6, 2025)"
pub fn week_caption(anchor: NaiveDate) -> String {
    let (monday, sunday) = iso_week_bounds(anchor);
    format!(
        "(Week of {} - {})",
        monday.format("%b %-d, %Y"),
        sunday.format("%b %-d, %Y")
    )
}
