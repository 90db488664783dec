use crate::infra::{AppState, DynPricingService};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cleanbook::error::AppError;
use cleanbook::pricing::{pricing_router, TimeWindowOption};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes(service: Arc<DynPricingService>) -> axum::Router {
    pricing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/pricing/windows/:key",
            axum::routing::get(time_window_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "pricingSource": state.pricing.current().source })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn time_window_endpoint(
    Extension(state): Extension<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TimeWindowOption>, AppError> {
    state
        .pricing
        .time_windows()
        .into_iter()
        .find(|option| option.key == key)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("time window '{key}'")))
}
