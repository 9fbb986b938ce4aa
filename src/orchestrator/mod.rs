//! Refresh state machine: owns the reading cache, the user's selection and
//! the chart registry, and re-runs filter → aggregate → render whenever one
//! of them changes.

pub mod runner;
pub mod selection;
pub mod snapshot;

pub use runner::{Command, Dashboard, DashboardHandle};
pub use selection::Selection;
pub use snapshot::{DashboardSnapshot, Notice, NoticeLevel, RefreshState};

use crate::aggregate::{aggregate_day, aggregate_week};
use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::filter::{filter_by_week, Filter};
use crate::readings::{normalize_all, ReadingSet};
use crate::render::{self, week_caption, ChartRegistry, Frame};
use crate::selectors::SelectorCatalogue;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All slots redrawn
    Rendered,
    /// Active filter matched nothing; charts torn down
    NoData,
    /// Fetch failed; cache left empty
    Failed,
    /// Result belonged to a superseded fetch and was ignored
    Stale,
}

#[derive(Debug)]
pub struct Orchestrator {
    tz: Tz,
    gauge_max_va: f64,
    state: RefreshState,
    cache: ReadingSet,
    selection: Selection,
    active_filter: Option<Filter>,
    registry: ChartRegistry,
    catalogue: SelectorCatalogue,
    week_caption: Option<String>,
    notice: Option<Notice>,
    issued_sequence: u64,
    last_refresh: Option<DateTime<Utc>>,
}

impl Orchestrator {
    pub fn new(tz: Tz, gauge_max_va: f64) -> Self {
        Self {
            tz,
            gauge_max_va,
            state: RefreshState::Empty,
            cache: ReadingSet::default(),
            selection: Selection::default(),
            active_filter: None,
            registry: ChartRegistry::new(),
            catalogue: SelectorCatalogue::default(),
            week_caption: None,
            notice: None,
            issued_sequence: 0,
            last_refresh: None,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Ok(Self::new(config.tz()?, config.gauge_max_va))
    }

    /// Discard the cache and enter `Loading`. Returns the sequence number the
    /// matching fetch result must carry.
    pub fn begin_refresh(&mut self) -> u64 {
        self.cache.clear();
        self.state = RefreshState::Loading;
        self.issued_sequence += 1;
        debug!("Refresh {} started", self.issued_sequence);
        self.issued_sequence
    }

    /// Apply a finished fetch. Only the most recently issued sequence is
    /// accepted.
    pub fn complete_refresh(&mut self, sequence: u64, result: Result<Vec<Value>>) -> RefreshOutcome {
        if sequence != self.issued_sequence {
            warn!(
                "Discarding stale fetch result {} (latest is {})",
                sequence, self.issued_sequence
            );
            return RefreshOutcome::Stale;
        }

        let records = match result {
            Ok(records) if records.is_empty() => return self.fail(AppError::EmptyPayload),
            Ok(records) => records,
            Err(e) => return self.fail(e),
        };

        let first_load = self.last_refresh.is_none();
        self.cache.replace(normalize_all(&records, &self.tz));
        self.catalogue = SelectorCatalogue::from_readings(&self.cache, &self.tz);
        self.last_refresh = Some(Utc::now());

        info!(
            "Loaded {} readings across {} day(s){}",
            self.cache.len(),
            self.catalogue.days.len(),
            if first_load { " (initial load)" } else { "" }
        );
        debug!(
            "Newest day {:?}, newest week {:?}",
            self.catalogue.latest_day(),
            self.catalogue.latest_week()
        );

        self.render()
    }

    fn fail(&mut self, err: AppError) -> RefreshOutcome {
        if err.is_fetch_failure() {
            error!("Failed to fetch readings: {}", err);
        } else {
            error!("Unexpected error during refresh: {:?}", err);
        }
        self.cache.clear();
        self.catalogue = SelectorCatalogue::default();
        self.state = RefreshState::Empty;
        self.notice = Some(Notice::error(format!("Failed to fetch data: {}", err)));
        RefreshOutcome::Failed
    }

    /// Record a user selection. Renders straight from the cache when one is
    /// present; otherwise the selection waits for the load in progress.
    pub fn select(&mut self, filter: Filter) -> Option<RefreshOutcome> {
        self.selection.record(filter);
        info!("Selection changed to {}", filter);
        self.render_if_loaded()
    }

    /// Step back one level. The first call releases the explicit pick so the
    /// remembered day (then week) selector takes over; a second call resets
    /// to the latest-day default.
    pub fn clear_selection(&mut self) -> Option<RefreshOutcome> {
        if let Some(previous) = self.selection.last_explicit() {
            self.selection.forget_explicit();
            info!("Released explicit selection {}", previous);
        } else {
            self.selection.clear();
            info!("Selection cleared");
        }
        self.render_if_loaded()
    }

    fn render_if_loaded(&mut self) -> Option<RefreshOutcome> {
        if self.cache.is_empty() {
            debug!("No cached readings; selection applies after the next load");
            return None;
        }
        Some(self.render())
    }

    /// Run filter → aggregate → draw against the cache.
    pub fn render(&mut self) -> RefreshOutcome {
        let tz = self.tz;
        self.state = RefreshState::Ready;

        let Some(filter) = self.selection.resolve(self.cache.latest_date(&tz)) else {
            self.tear_down("No readings with a usable timestamp".to_string());
            return RefreshOutcome::NoData;
        };
        self.active_filter = Some(filter);

        let in_view = filter.apply(self.cache.as_slice(), &tz);
        if in_view.is_empty() {
            self.tear_down(format!("No data for selected {}", filter));
            return RefreshOutcome::NoData;
        }

        let day = aggregate_day(&in_view);
        let gauge_value = in_view
            .iter()
            .filter(|r| r.timestamp.is_some())
            .max_by_key(|r| r.timestamp)
            .map(|r| r.phase1_apparent)
            .unwrap_or(0.0);

        let week_readings = filter_by_week(self.cache.as_slice(), filter.anchor(), &tz);
        let week = aggregate_week(&week_readings, &tz);

        let frame = Frame {
            day: &day,
            week: &week,
            gauge_value,
        };
        render::draw(&mut self.registry, &frame, &tz, self.gauge_max_va);

        self.week_caption = Some(week_caption(filter.anchor()));
        self.notice = None;

        debug!(
            "Rendered {}: {} point(s), {} week day(s)",
            filter,
            day.points.len(),
            week.len()
        );
        RefreshOutcome::Rendered
    }

    fn tear_down(&mut self, message: String) {
        warn!("{}", message);
        let destroyed = self.registry.clear();
        debug!("Tore down {} chart instance(s)", destroyed);
        self.week_caption = None;
        self.notice = Some(Notice::warning(message));
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            state: self.state,
            active_filter: self.active_filter,
            charts: self.registry.instances(),
            selectors: self.catalogue.clone(),
            week_caption: self.week_caption.clone(),
            notice: self.notice.clone(),
            fetch_sequence: self.issued_sequence,
            reading_count: self.cache.len(),
            last_refresh: self.last_refresh,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn cache(&self) -> &ReadingSet {
        &self.cache
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    pub fn active_filter(&self) -> Option<Filter> {
        self.active_filter
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.issued_sequence
    }
}
