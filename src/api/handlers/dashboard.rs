use crate::orchestrator::{DashboardHandle, DashboardSnapshot};
use crate::render::{ChartInstance, ChartSlot};
use crate::selectors::SelectorCatalogue;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::debug;

pub async fn get_dashboard(State(handle): State<DashboardHandle>) -> Json<DashboardSnapshot> {
    Json(handle.snapshot())
}

pub async fn get_chart(
    State(handle): State<DashboardHandle>,
    Path(slot): Path<String>,
) -> Result<Json<ChartInstance>, StatusCode> {
    let slot: ChartSlot = slot.parse().map_err(|e| {
        debug!("Rejected chart request: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    handle
        .snapshot()
        .charts
        .into_iter()
        .find(|c| c.slot == slot)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_selectors(State(handle): State<DashboardHandle>) -> Json<SelectorCatalogue> {
    Json(handle.snapshot().selectors)
}
