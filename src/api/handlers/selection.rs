use crate::api::models::{DaySelectionRequest, SelectionResponse, WeekSelectionRequest};
use crate::filter::{parse_date, week_start, Filter};
use crate::orchestrator::DashboardHandle;
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, warn};

pub async fn select_day(
    State(handle): State<DashboardHandle>,
    Json(body): Json<DaySelectionRequest>,
) -> Result<(StatusCode, Json<SelectionResponse>), StatusCode> {
    let date = parse_date(&body.date).map_err(|e| {
        warn!("{}", e);
        StatusCode::BAD_REQUEST
    })?;

    submit(&handle, Filter::Day(date)).await
}

pub async fn select_week(
    State(handle): State<DashboardHandle>,
    Json(body): Json<WeekSelectionRequest>,
) -> Result<(StatusCode, Json<SelectionResponse>), StatusCode> {
    let anchor = parse_date(&body.week_start).map_err(|e| {
        warn!("{}", e);
        StatusCode::BAD_REQUEST
    })?;

    submit(&handle, Filter::Week(week_start(anchor))).await
}

pub async fn clear_selection(State(handle): State<DashboardHandle>) -> StatusCode {
    match handle.clear_selection().await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            error!("Failed to clear selection: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn refresh(State(handle): State<DashboardHandle>) -> StatusCode {
    match handle.refresh().await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            error!("Failed to request refresh: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn submit(
    handle: &DashboardHandle,
    filter: Filter,
) -> Result<(StatusCode, Json<SelectionResponse>), StatusCode> {
    handle.select(filter).await.map_err(|e| {
        error!("Failed to submit selection {}: {}", filter, e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectionResponse { accepted: filter }),
    ))
}
