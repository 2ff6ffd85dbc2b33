use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::assistant::applications::domain::NewApplication;
use crate::assistant::applications::service::ApplicationService;
use crate::assistant::testing::MemoryStore;

pub(super) fn submission() -> NewApplication {
    NewApplication {
        applicant: "Acme Logistics".to_string(),
        site_address: Some("12 Grid Lane, Des Moines".to_string()),
        power_kw: Some(150),
        connectors: vec!["CCS".to_string(), "Type 2".to_string()],
        contact: Some("ops@acme.example".to_string()),
        notes: Some("fleet depot".to_string()),
    }
}

pub(super) fn build_service() -> Arc<ApplicationService<MemoryStore>> {
    Arc::new(ApplicationService::new(Arc::new(MemoryStore::default())))
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
