use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use ev_assist::assistant::applications::{
    ApplicationId, ApplicationRecord, ApplicationStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Volatile store for demos and tests; same contract as the file-backed one.
#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    records: Mutex<HashMap<String, ApplicationRecord>>,
}

impl ApplicationStore for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(record.app_id.as_str()) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.app_id.as_str().to_string(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if !guard.contains_key(record.app_id.as_str()) {
            return Err(StoreError::NotFound);
        }
        guard.insert(record.app_id.as_str().to_string(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id.as_str()).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}
