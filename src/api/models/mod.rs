pub mod selection;

pub use selection::{DaySelectionRequest, SelectionResponse, WeekSelectionRequest};
