use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use super::domain::{ApplicationId, ApplicationRecord};
use super::store::{ApplicationStore, StoreError};

/// File-backed store keeping the whole application map in one JSON document.
///
/// The document is read in full at startup and rewritten in full before any
/// mutation reports success. Concurrent writers on the same file are not
/// coordinated; last write wins.
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, ApplicationRecord>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(unavailable)?;
            serde_json::from_str(&raw).map_err(unavailable)?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), "opened application store");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn persist(&self, records: &BTreeMap<String, ApplicationRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(unavailable)?;
            }
        }
        let raw = serde_json::to_string_pretty(records).map_err(unavailable)?;
        fs::write(&self.path, raw).map_err(unavailable)
    }
}

fn unavailable(err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl ApplicationStore for JsonFileStore {
    // A failed write must not leave the cache ahead of the file, so every
    // mutation is rolled back when persist errors.
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(record.app_id.as_str()) {
            return Err(StoreError::Conflict);
        }
        let key = record.app_id.as_str().to_string();
        guard.insert(key.clone(), record.clone());
        if let Err(err) = self.persist(&guard) {
            guard.remove(&key);
            return Err(err);
        }
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if !guard.contains_key(record.app_id.as_str()) {
            return Err(StoreError::NotFound);
        }
        let key = record.app_id.as_str().to_string();
        let previous = guard.insert(key.clone(), record);
        if let Err(err) = self.persist(&guard) {
            if let Some(previous) = previous {
                guard.insert(key, previous);
            }
            return Err(err);
        }
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
