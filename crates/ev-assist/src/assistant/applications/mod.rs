//! Application-tracking records for charging-station applicants.
//!
//! Records are owned by an [`ApplicationStore`] implementation; the bundled
//! [`JsonFileStore`] rewrites a single JSON document on every mutation.

pub mod domain;
pub mod json_store;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDetails, ApplicationId, ApplicationRecord, NewApplication, ProgressEntry,
    ValidationError, INITIAL_STATUS,
};
pub use json_store::JsonFileStore;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use store::{ApplicationStore, StoreError};
