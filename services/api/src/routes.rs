use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use skillbridge::accounts::{ClaimSetter, IdentityProvider, ProfileStore};
use skillbridge::workflows::directory::{directory_router, ProfileDirectory};
use skillbridge::workflows::registration::{registration_router, RegistrationState};
use std::sync::Arc;

pub(crate) fn with_marketplace_routes<I, S, C, D>(
    registration: RegistrationState<I, S, C>,
    directory: Arc<D>,
) -> axum::Router
where
    I: IdentityProvider + 'static,
    S: ProfileStore + 'static,
    C: ClaimSetter + 'static,
    D: ProfileDirectory + 'static,
{
    registration_router(registration)
        .merge(directory_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
        json!({ "status": "ready" })
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
