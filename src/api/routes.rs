use crate::api::handlers::{dashboard, health, selection};
use crate::orchestrator::DashboardHandle;
use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(handle: DashboardHandle) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    let api_routes = Router::new()
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route("/api/v1/charts/{slot}", get(dashboard::get_chart))
        .route("/api/v1/selectors", get(dashboard::get_selectors))
        .route("/api/v1/selection/day", post(selection::select_day))
        .route("/api/v1/selection/week", post(selection::select_week))
        .route(
            "/api/v1/selection",
            axum::routing::delete(selection::clear_selection),
        )
        .route("/api/v1/refresh", post(selection::refresh));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(handle)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |_response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::INFO, latency = ?latency, "request completed");
                    },
                ),
        )
}
