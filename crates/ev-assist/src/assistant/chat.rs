//! Reply composition: classify, then branch on intent into the knowledge
//! base and the application store.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::applications::{
    ApplicationService, ApplicationServiceError, ApplicationStore, StoreError, ValidationError,
};
use super::intent::{Intent, IntentClassifier, Slots};
use super::knowledge::KnowledgeBase;

/// Everything the chat surface reports about one handled message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub reply: String,
    pub intent: Intent,
    pub confidence: f64,
    pub slots: Slots,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_status: Option<String>,
    pub progress_recorded: bool,
}

/// Chat front end over the classifier, knowledge base, and application store.
pub struct ChatEngine<S> {
    classifier: IntentClassifier,
    knowledge: KnowledgeBase,
    applications: Arc<ApplicationService<S>>,
}

impl<S> ChatEngine<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(
        classifier: IntentClassifier,
        knowledge: KnowledgeBase,
        applications: Arc<ApplicationService<S>>,
    ) -> Self {
        Self {
            classifier,
            knowledge,
            applications,
        }
    }

    /// Handle one message. An unknown application id becomes reply text, not
    /// an error; only store unavailability propagates.
    pub fn respond(&self, text: &str) -> Result<ChatOutcome, ApplicationServiceError> {
        let classification = self.classifier.classify(text);
        debug!(intent = %classification.intent, confidence = classification.confidence, "classified message");

        let mut reply_parts: Vec<String> = Vec::new();
        let mut application_status = None;
        let mut progress_recorded = false;

        if let Some(answer) = self.knowledge.answer_for_intent(classification.intent) {
            reply_parts.push(answer.to_string());
        }

        if classification.intent == Intent::StatusCheck {
            if let Some(id) = &classification.slots.app_id {
                match self.applications.status_of(id) {
                    Ok(status) => {
                        reply_parts.push(format!("Application {id} status: {status}"));
                        application_status = Some(status);
                    }
                    Err(ApplicationServiceError::Store(StoreError::NotFound)) => {
                        reply_parts.push(missing_application_line(id.as_str()));
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        if classification.intent == Intent::ProgressUpdate {
            // Both slots are required; an incomplete slot set records nothing.
            if let (Some(id), Some(message)) =
                (&classification.slots.app_id, &classification.slots.message)
            {
                match self.applications.add_progress(id, message) {
                    Ok(()) => {
                        progress_recorded = true;
                        reply_parts.push(format!("Progress noted for {id}: {message}"));
                    }
                    Err(ApplicationServiceError::Store(StoreError::NotFound)) => {
                        reply_parts.push(missing_application_line(id.as_str()));
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        match classification.intent {
            Intent::Greeting => {
                reply_parts.push("Hello! I can help with EV charging info and applications.".to_string());
            }
            Intent::Goodbye => reply_parts.push("Goodbye! Drive electric!".to_string()),
            Intent::Help => reply_parts.push(
                "Ask me about finding chargers, costs, incentives, how to apply, or application status like 'status of APP-123456'."
                    .to_string(),
            ),
            _ => {}
        }

        if reply_parts.is_empty() {
            reply_parts.push("I'm not sure. Try rephrasing or ask for help.".to_string());
        }

        Ok(ChatOutcome {
            reply: reply_parts.join("\n"),
            intent: classification.intent,
            confidence: classification.confidence,
            slots: classification.slots,
            application_status,
            progress_recorded,
        })
    }
}

fn missing_application_line(id: &str) -> String {
    format!("I couldn't find application {id}. Please check the ID.")
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    pub(crate) text: String,
}

/// Router builder exposing the chat endpoint.
pub fn chat_router<S>(engine: Arc<ChatEngine<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route("/api/chat", post(chat_handler::<S>))
        .with_state(engine)
}

pub(crate) async fn chat_handler<S>(
    State(engine): State<Arc<ChatEngine<S>>>,
    axum::Json(payload): axum::Json<ChatRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    if payload.text.is_empty() {
        let payload = json!({ "error": ValidationError::EmptyText.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match engine.respond(&payload.text) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
