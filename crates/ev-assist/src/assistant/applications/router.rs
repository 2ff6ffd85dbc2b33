use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationId, NewApplication, ValidationError, MIN_MESSAGE_LEN};
use super::service::{ApplicationService, ApplicationServiceError};
use super::store::{ApplicationStore, StoreError};

/// Router builder exposing HTTP endpoints for application tracking.
pub fn application_router<S>(service: Arc<ApplicationService<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/applications/search", get(search_handler::<S>))
        .route("/api/applications/:app_id", get(get_handler::<S>))
        .route(
            "/api/applications/:app_id/status",
            post(update_status_handler::<S>),
        )
        .route(
            "/api/applications/:app_id/progress",
            post(add_progress_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateApplicationRequest {
    pub(crate) applicant: String,
    #[serde(default)]
    pub(crate) site_address: Option<String>,
    #[serde(default)]
    pub(crate) power_kw: Option<u32>,
    /// Accepts either a JSON list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_connectors")]
    pub(crate) connectors: Vec<String>,
    #[serde(default)]
    pub(crate) contact: Option<String>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

impl CreateApplicationRequest {
    fn into_submission(self) -> NewApplication {
        NewApplication {
            applicant: self.applicant,
            site_address: self.site_address,
            power_kw: self.power_kw,
            connectors: self.connectors,
            contact: self.contact,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateApplicationResponse {
    pub(crate) app_id: ApplicationId,
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRequest {
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) applicant: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConnectorsField {
    List(Vec<String>),
    Text(String),
}

fn deserialize_connectors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let field = Option::<ConnectorsField>::deserialize(deserializer)?;
    let connectors = match field {
        None => Vec::new(),
        Some(ConnectorsField::List(items)) => items,
        Some(ConnectorsField::Text(raw)) => raw.split(',').map(str::to_string).collect(),
    };
    Ok(connectors
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    axum::Json(payload): axum::Json<CreateApplicationRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.create(payload.into_submission()) {
        Ok(record) => (
            StatusCode::CREATED,
            axum::Json(CreateApplicationResponse {
                app_id: record.app_id,
                status: record.status,
            }),
        )
            .into_response(),
        Err(ApplicationServiceError::Validation(error)) => validation_response(&error),
        Err(other) => internal_response(&other),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(app_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let id = ApplicationId(app_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => not_found_response(&id),
        Err(other) => internal_response(&other),
    }
}

pub(crate) async fn update_status_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(app_id): Path<String>,
    axum::Json(payload): axum::Json<StatusUpdateRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let id = ApplicationId(app_id);
    match service.update_status(&id, &payload.status) {
        Ok(()) => ok_response(),
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => not_found_response(&id),
        Err(other) => internal_response(&other),
    }
}

pub(crate) async fn add_progress_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(app_id): Path<String>,
    axum::Json(payload): axum::Json<ProgressRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    if payload.message.trim().chars().count() < MIN_MESSAGE_LEN {
        return validation_response(&ValidationError::MessageTooShort {
            min: MIN_MESSAGE_LEN,
        });
    }

    let id = ApplicationId(app_id);
    match service.add_progress(&id, &payload.message) {
        Ok(()) => ok_response(),
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => not_found_response(&id),
        Err(other) => internal_response(&other),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => internal_response(&error),
    }
}

pub(crate) async fn search_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.find_by_applicant(&query.applicant) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => internal_response(&error),
    }
}

fn ok_response() -> Response {
    (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response()
}

fn validation_response(error: &ValidationError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn not_found_response(id: &ApplicationId) -> Response {
    let payload = json!({ "error": format!("application {id} not found") });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_response(error: &ApplicationServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
