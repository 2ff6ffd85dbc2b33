use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ev_assist::assistant::applications::{application_router, ApplicationService, ApplicationStore};
use ev_assist::assistant::chat::{chat_router, ChatEngine};
use serde_json::json;
use std::sync::Arc;

/// Compose the chat and application routers with the operational endpoints.
pub(crate) fn assistant_routes<S>(
    engine: Arc<ChatEngine<S>>,
    applications: Arc<ApplicationService<S>>,
) -> axum::Router
where
    S: ApplicationStore + 'static,
{
    chat_router(engine)
        .merge(application_router(applications))
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
