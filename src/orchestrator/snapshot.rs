use crate::filter::Filter;
use crate::render::ChartInstance;
use crate::selectors::SelectorCatalogue;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    /// Nothing fetched, or the last fetch failed
    Empty,
    Loading,
    /// Cache populated and a render has happened
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing message attached to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Read-only view of the dashboard, published as a whole after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub state: RefreshState,
    pub active_filter: Option<Filter>,
    pub charts: Vec<ChartInstance>,
    pub selectors: SelectorCatalogue,
    pub week_caption: Option<String>,
    pub notice: Option<Notice>,
    pub fetch_sequence: u64,
    pub reading_count: usize,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            state: RefreshState::Empty,
            active_filter: None,
            charts: Vec::new(),
            selectors: SelectorCatalogue::default(),
            week_caption: None,
            notice: None,
            fetch_sequence: 0,
            reading_count: 0,
            last_refresh: None,
        }
    }
}
