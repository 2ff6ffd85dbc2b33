use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for charging-station applications.
///
/// Canonical lexical form is `APP-` followed by 3 to 8 digits, uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status every freshly created application starts in.
pub const INITIAL_STATUS: &str = "Received";

/// Structured site and contact details captured at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApplicationDetails {
    pub fn is_empty(&self) -> bool {
        self.site_address.is_none()
            && self.power_kw.is_none()
            && self.connectors.is_empty()
            && self.contact.is_none()
            && self.notes.is_none()
    }
}

/// One timestamped note in an application's append-only progress log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Tracking record for one application.
///
/// `app_id` is unique within a store. `progress` entries are only ever
/// appended, never reordered or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub app_id: ApplicationId,
    pub applicant: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "ApplicationDetails::is_empty")]
    pub details: ApplicationDetails,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
}

impl ApplicationRecord {
    /// Build a fresh record in the initial status with a one-entry progress
    /// log noting the submission.
    pub fn submitted(
        app_id: ApplicationId,
        submission: NewApplication,
        created_at: DateTime<Utc>,
    ) -> Self {
        let NewApplication {
            applicant,
            site_address,
            power_kw,
            connectors,
            contact,
            notes,
        } = submission;

        let seed = ProgressEntry {
            timestamp: created_at,
            message: format!("Submitted by {applicant}"),
        };

        Self {
            app_id,
            applicant,
            status: INITIAL_STATUS.to_string(),
            created_at,
            details: ApplicationDetails {
                site_address,
                power_kw,
                connectors,
                contact,
                notes,
            },
            progress: vec![seed],
        }
    }

    pub fn push_progress(&mut self, message: impl Into<String>, timestamp: DateTime<Utc>) {
        self.progress.push(ProgressEntry {
            timestamp,
            message: message.into(),
        });
    }
}

/// Applicant-provided fields for a new application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub applicant: String,
    #[serde(default)]
    pub site_address: Option<String>,
    #[serde(default)]
    pub power_kw: Option<u32>,
    #[serde(default)]
    pub connectors: Vec<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const MIN_APPLICANT_LEN: usize = 2;
pub const MIN_MESSAGE_LEN: usize = 2;
pub const POWER_KW_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

impl NewApplication {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.applicant.trim().chars().count() < MIN_APPLICANT_LEN {
            return Err(ValidationError::ApplicantTooShort {
                min: MIN_APPLICANT_LEN,
            });
        }
        if let Some(power_kw) = self.power_kw {
            if !POWER_KW_RANGE.contains(&power_kw) {
                return Err(ValidationError::PowerOutOfRange { given: power_kw });
            }
        }
        Ok(())
    }
}

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("applicant name must be at least {min} characters")]
    ApplicantTooShort { min: usize },
    #[error("power_kw must be between 1 and 1000, got {given}")]
    PowerOutOfRange { given: u32 },
    #[error("progress message must be at least {min} characters")]
    MessageTooShort { min: usize },
    #[error("text must not be empty")]
    EmptyText,
}
