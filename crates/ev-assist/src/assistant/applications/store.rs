use super::domain::{ApplicationId, ApplicationRecord};

/// Storage abstraction so the service layer can be exercised in isolation
/// and the flat-file backend can be swapped out later.
pub trait ApplicationStore: Send + Sync {
    /// Insert a new record; `Conflict` if the id is already taken.
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError>;
    /// Replace an existing record; `NotFound` if the id is unknown.
    fn update(&self, record: ApplicationRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;
    fn list(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
