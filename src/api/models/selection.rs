use crate::filter::Filter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DaySelectionRequest {
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct WeekSelectionRequest {
    /// Any `YYYY-MM-DD` inside the week; normally its Monday
    pub week_start: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub accepted: Filter,
}
