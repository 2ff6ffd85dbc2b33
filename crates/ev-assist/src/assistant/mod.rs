//! Chat assistant for EV charging-station applicants.
//!
//! A rule-based classifier maps free-text messages onto a closed intent set,
//! FAQ intents are answered from a static knowledge base, and application
//! intents read or append to file-persisted tracking records.

pub mod applications;
pub mod chat;
pub mod intent;
pub mod knowledge;

#[cfg(test)]
pub(crate) mod testing;

pub use applications::{
    application_router, ApplicationDetails, ApplicationId, ApplicationRecord, ApplicationService,
    ApplicationServiceError, ApplicationStore, JsonFileStore, NewApplication, ProgressEntry,
    StoreError, ValidationError, INITIAL_STATUS,
};
pub use chat::{chat_router, ChatEngine, ChatOutcome};
pub use intent::{Classification, Intent, IntentClassifier, Slots};
pub use knowledge::{FaqEntry, KnowledgeBase, KnowledgeError};
