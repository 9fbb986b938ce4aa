//! Derived views over a filtered reading slice.
//!
//! Both aggregators report a per-phase "peak", but they are different
//! signals: the day view takes the source's peak-current field, the week
//! view takes the largest apparent-power sample.

pub mod day;
pub mod week;

pub use day::{aggregate_day, DayPoint, DaySummary};
pub use week::{aggregate_week, WeekDay, WeekSummary};
