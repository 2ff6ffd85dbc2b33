use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::info;

use super::domain::{ApplicationId, ApplicationRecord, NewApplication, ValidationError};
use super::store::{ApplicationStore, StoreError};

/// Bound on id-generation retries before the store is declared exhausted.
const MAX_ID_ATTEMPTS: u32 = 1000;

/// Service composing validation, id generation, and the store.
pub struct ApplicationService<S> {
    store: Arc<S>,
}

fn random_application_id() -> ApplicationId {
    let number = rand::thread_rng().gen_range(100_000..=999_999);
    ApplicationId(format!("APP-{number}"))
}

impl<S> ApplicationService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a new application under a freshly generated id.
    ///
    /// Id collisions are retried up to a bounded attempt count; exhausting
    /// them is treated as a fatal condition rather than an expected outcome.
    pub fn create(
        &self,
        submission: NewApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        submission.validate()?;

        let created_at = Utc::now();
        for _ in 0..MAX_ID_ATTEMPTS {
            let app_id = random_application_id();
            let record = ApplicationRecord::submitted(app_id, submission.clone(), created_at);
            match self.store.insert(record) {
                Ok(stored) => {
                    info!(app_id = %stored.app_id, applicant = %stored.applicant, "application created");
                    return Ok(stored);
                }
                Err(StoreError::Conflict) => continue,
                Err(other) => return Err(other.into()),
            }
        }
        Err(ApplicationServiceError::IdSpaceExhausted)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    pub fn status_of(&self, id: &ApplicationId) -> Result<String, ApplicationServiceError> {
        Ok(self.get(id)?.status)
    }

    /// Set a new status and note the change in the progress log.
    pub fn update_status(
        &self,
        id: &ApplicationId,
        status: &str,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.get(id)?;
        record.status = status.to_string();
        record.push_progress(format!("Status changed to {status}"), Utc::now());
        self.store.update(record)?;
        Ok(())
    }

    pub fn add_progress(
        &self,
        id: &ApplicationId,
        message: &str,
    ) -> Result<(), ApplicationServiceError> {
        let mut record = self.get(id)?;
        record.push_progress(message, Utc::now());
        self.store.update(record)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.store.list()?)
    }

    /// Case-insensitive substring match on the applicant name.
    pub fn find_by_applicant(
        &self,
        needle: &str,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        let needle = needle.to_lowercase();
        let mut records = self.store.list()?;
        records.retain(|record| record.applicant.to_lowercase().contains(&needle));
        Ok(records)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unable to allocate a unique application id")]
    IdSpaceExhausted,
}
