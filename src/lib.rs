pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod readings;
pub mod render;
pub mod selectors;
pub mod source;

// Re-export commonly used items
pub use config::Config;
pub use error::{AppError, Result};
pub use filter::Filter;
pub use orchestrator::{Dashboard, DashboardHandle, DashboardSnapshot, Orchestrator, RefreshState};
pub use readings::{Reading, ReadingSet};
pub use source::{HttpReadingSource, ReadingSource};
