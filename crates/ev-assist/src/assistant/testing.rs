//! Shared test doubles for the assistant modules.

use std::collections::HashMap;
use std::sync::Mutex;

use super::applications::{ApplicationId, ApplicationRecord, ApplicationStore, StoreError};

/// In-memory store mirroring the JSON file store's contract.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<String, ApplicationRecord>>,
}

impl ApplicationStore for MemoryStore {
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

/// Store whose every operation fails, for exercising error paths.
pub(crate) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("disk gone".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk gone".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("disk gone".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("disk gone".to_string()))
    }
}

/// Store that reports every id as taken, for exhausting id generation.
pub(crate) struct AlwaysConflictStore;

impl ApplicationStore for AlwaysConflictStore {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Conflict)
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Ok(Vec::new())
    }
}
