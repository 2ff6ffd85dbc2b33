//! Static FAQ knowledge base keyed by entry id and mapped from intents.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::intent::Intent;

/// One question/answer pair from the FAQ document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct FaqDocument {
    #[serde(default)]
    faq: Vec<FaqEntry>,
}

/// Read-only FAQ lookup. A missing backing file yields an empty base, not an
/// error; an unmapped intent or unknown id yields no answer, not an error.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, FaqEntry>,
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: FaqDocument =
            serde_json::from_str(&raw).map_err(|source| KnowledgeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_entries(document.faq))
    }

    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    /// Seed entries matching the shipped `data/faq.json`, for demos and tests
    /// that run without a data directory.
    pub fn seed() -> Self {
        let entry = |id: &str, question: &str, answer: &str| FaqEntry {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        };
        Self::from_entries(vec![
            entry(
                "find_station",
                "Where can I find an EV charging station?",
                "You can locate public charging stations through the national charging map or your utility's station finder. Most navigation apps also list nearby chargers with live availability.",
            ),
            entry(
                "cost",
                "How much does EV charging cost?",
                "Public charging typically costs between $0.20 and $0.50 per kWh depending on the operator and charging speed. Many government sites offer discounted or free charging during off-peak hours.",
            ),
            entry(
                "hours",
                "When are charging stations open?",
                "Most public charging stations operate 24/7. Stations at government facilities may follow building hours, which are posted at each site.",
            ),
            entry(
                "incentives",
                "What incentives are available for charging stations?",
                "Grants, rebates, and tax incentives are available for installing EV charging stations. Applicants can combine federal infrastructure grants with state-level rebates in most cases.",
            ),
            entry(
                "requirements",
                "What are the technical requirements for a charging station?",
                "Stations must use OCPP-compliant chargers with Type 2 or CCS connectors, support at least 7 kW per charge point, and meet local electrical safety standards.",
            ),
            entry(
                "apply",
                "How do I apply to set up a charging station?",
                "Submit an application with your site address, requested power capacity, and connector types. You'll receive an application ID like APP-123456 to track status and record progress.",
            ),
        ])
    }

    pub fn answer(&self, faq_id: &str) -> Option<&str> {
        self.entries.get(faq_id).map(|entry| entry.answer.as_str())
    }

    pub fn answer_for_intent(&self, intent: Intent) -> Option<&str> {
        self.answer(faq_id_for(intent)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed wiring from FAQ-style intents to FAQ entry ids.
const fn faq_id_for(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::FaqFindStation => Some("find_station"),
        Intent::FaqCost => Some("cost"),
        Intent::FaqHours => Some("hours"),
        Intent::FaqIncentives => Some("incentives"),
        Intent::FaqRequirements => Some("requirements"),
        Intent::ApplyHow => Some("apply"),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read FAQ file {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed FAQ file {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
