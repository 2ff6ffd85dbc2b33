//! Rule-based intent classification and slot extraction.
//!
//! The classifier scans an ordered pattern table and keeps the rule with the
//! highest configured weight. Replacement requires strictly greater weight,
//! so the earliest-declared rule wins when two rules share the top weight.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::applications::ApplicationId;

/// Closed set of message intents the assistant understands.
///
/// `Fallback` covers text no rule matches; `Empty` covers whitespace-only
/// input and short-circuits pattern matching entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Goodbye,
    Help,
    FaqFindStation,
    FaqCost,
    FaqHours,
    FaqIncentives,
    FaqRequirements,
    ApplyHow,
    StatusCheck,
    ProgressUpdate,
    Empty,
    Fallback,
}

impl Intent {
    pub const fn label(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Goodbye => "goodbye",
            Intent::Help => "help",
            Intent::FaqFindStation => "faq_find_station",
            Intent::FaqCost => "faq_cost",
            Intent::FaqHours => "faq_hours",
            Intent::FaqIncentives => "faq_incentives",
            Intent::FaqRequirements => "faq_requirements",
            Intent::ApplyHow => "apply_how",
            Intent::StatusCheck => "status_check",
            Intent::ProgressUpdate => "progress_update",
            Intent::Empty => "empty",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Slots extracted from the message text alongside the intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<ApplicationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Slots {
    pub fn is_empty(&self) -> bool {
        self.app_id.is_none() && self.message.is_none()
    }
}

/// Best-effort classification of one user message. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    pub slots: Slots,
}

struct IntentRule {
    intent: Intent,
    weight: f64,
    pattern: Regex,
}

const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Classifier over a fixed, ordered pattern table. Immutable once built.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    app_id: Regex,
    id_message: Regex,
    update_message: Regex,
}

impl IntentClassifier {
    pub fn new() -> Self {
        fn rule(intent: Intent, weight: f64, pattern: &str) -> IntentRule {
            IntentRule {
                intent,
                weight,
                pattern: Regex::new(pattern).expect("hand-written pattern compiles"),
            }
        }

        // Weights drive selection; a later rule for the same intent adds an
        // alternative phrasing at a different confidence.
        let rules = vec![
            rule(
                Intent::Greeting,
                0.9,
                r"(?i)\b(hi|hello|hey|good\s*(?:morning|afternoon|evening))\b",
            ),
            rule(Intent::Goodbye, 0.9, r"(?i)\b(bye|goodbye|see\s*ya|see\s*you)\b"),
            rule(
                Intent::Help,
                0.8,
                r"(?i)\b(help|what\s+can\s+you\s+do|how\s+to\s+use)\b",
            ),
            rule(
                Intent::FaqFindStation,
                0.92,
                r"(?i)\b(find|nearby|nearest|where)\b.*\b(charger|charging\s*station|ev\s*station|charging)\b",
            ),
            rule(
                Intent::FaqCost,
                0.9,
                r"(?i)\b(cost|price|pricing|tariff|rate|fees?)\b.*\b(charging|charger|ev)\b|\bcharge\b.*\b(cost|price)\b",
            ),
            rule(
                Intent::FaqHours,
                0.85,
                r"(?i)\b(hours?|open|24/?7|availability)\b.*\b(charging|station|charger)\b",
            ),
            rule(
                Intent::FaqIncentives,
                0.88,
                r"(?i)\b(grants?|incentives?|subsid(y|ies)|rebates?)\b",
            ),
            rule(
                Intent::FaqRequirements,
                0.88,
                r"(?i)\b(technical\s*requirements?|specs?|power|kw|ocpp|connector|safety|standards?)\b",
            ),
            rule(
                Intent::ApplyHow,
                0.95,
                r"(?i)\b(apply|application|set\s*up|setup|install|permit)\b.*\b(charging|station|ev)\b",
            ),
            rule(
                Intent::StatusCheck,
                0.93,
                r"(?i)\b(status|track|progress|where\s*is)\b.*\b(APP-\d{3,8})\b",
            ),
            rule(Intent::StatusCheck, 0.75, r"(?i)\bstatus\b.*\b(application)\b"),
            rule(
                Intent::ProgressUpdate,
                0.96,
                r"(?i)\b(update|add|record|log)\b.*\b(progress|update|note)\b.*\b(APP-\d{3,8})\b",
            ),
            rule(
                Intent::ProgressUpdate,
                0.9,
                r"(?i)\bupdate\b\s*(?:progress\s*)?(APP-\d{3,8})\s*[:\-]\s*(.+)$",
            ),
        ];

        Self {
            rules,
            app_id: Regex::new(r"(?i)\bAPP-\d{3,8}\b").expect("hand-written pattern compiles"),
            id_message: Regex::new(r"(?i)(APP-\d{3,8})\s*[:\-]\s*(.+)$")
                .expect("hand-written pattern compiles"),
            update_message: Regex::new(r"(?i)update[\s:,-]+(.+)$")
                .expect("hand-written pattern compiles"),
        }
    }

    /// Classify one message. Never fails; malformed input degrades to
    /// `Fallback` (or `Empty` for whitespace-only text).
    pub fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification {
                intent: Intent::Empty,
                confidence: 1.0,
                slots: Slots::default(),
            };
        }

        let mut best_intent = Intent::Fallback;
        let mut best_confidence = FALLBACK_CONFIDENCE;
        for rule in &self.rules {
            // Strict inequality: ties keep the earliest-declared rule.
            if rule.weight > best_confidence && rule.pattern.is_match(text) {
                best_intent = rule.intent;
                best_confidence = rule.weight;
            }
        }

        let mut slots = Slots::default();
        if let Some(found) = self.app_id.find(text) {
            slots.app_id = Some(ApplicationId(found.as_str().to_uppercase()));
        }
        if best_intent == Intent::ProgressUpdate {
            slots.message = self.extract_message(text);
        }

        Classification {
            intent: best_intent,
            confidence: round_confidence(best_confidence),
            slots,
        }
    }

    /// Ordered preference: text after `APP-nnn:`/`APP-nnn-`, else text after
    /// the word "update". An id-separator match that trims to nothing yields
    /// no slot rather than falling through.
    fn extract_message(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.id_message.captures(text) {
            let message = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            if message.is_empty() {
                return None;
            }
            return Some(message.to_string());
        }

        self.update_message
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|message| !message.is_empty())
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new()
    }

    fn app_id(value: &str) -> ApplicationId {
        ApplicationId(value.to_string())
    }

    #[test]
    fn empty_and_whitespace_input_short_circuits() {
        for text in ["", "   ", "\n\t "] {
            let result = classifier().classify(text);
            assert_eq!(result.intent, Intent::Empty);
            assert_eq!(result.confidence, 1.0);
            assert!(result.slots.is_empty());
        }
    }

    #[test]
    fn greeting_matches_with_configured_weight() {
        let result = classifier().classify("hi");
        assert_eq!(result.intent, Intent::Greeting);
        assert_eq!(result.confidence, 0.9);
        assert!(result.slots.is_empty());
    }

    #[test]
    fn status_check_extracts_application_id() {
        let result = classifier().classify("status of APP-123456");
        assert_eq!(result.intent, Intent::StatusCheck);
        assert_eq!(result.confidence, 0.93);
        assert_eq!(result.slots.app_id, Some(app_id("APP-123456")));
        assert!(result.slots.message.is_none());
    }

    #[test]
    fn progress_update_extracts_id_and_message() {
        let result =
            classifier().classify("update APP-123456: contractor selected and equipment ordered");
        assert_eq!(result.intent, Intent::ProgressUpdate);
        assert_eq!(result.slots.app_id, Some(app_id("APP-123456")));
        assert_eq!(
            result.slots.message.as_deref(),
            Some("contractor selected and equipment ordered")
        );
    }

    #[test]
    fn unmatched_text_falls_back() {
        let result = classifier().classify("xyzzy plugh quux");
        assert_eq!(result.intent, Intent::Fallback);
        assert_eq!(result.confidence, 0.1);
        assert!(result.slots.is_empty());
    }

    #[test]
    fn application_id_slot_attaches_regardless_of_intent() {
        let result = classifier().classify("random words app-00123 more words");
        assert_eq!(result.intent, Intent::Fallback);
        assert_eq!(result.slots.app_id, Some(app_id("APP-00123")));
    }

    #[test]
    fn application_id_is_uppercased() {
        let result = classifier().classify("status of app-123456");
        assert_eq!(result.slots.app_id, Some(app_id("APP-123456")));
    }

    #[test]
    fn id_fragments_outside_digit_bounds_are_ignored() {
        let too_short = classifier().classify("look at APP-12 please");
        assert!(too_short.slots.app_id.is_none());

        let too_long = classifier().classify("look at APP-123456789 please");
        assert!(too_long.slots.app_id.is_none());
    }

    #[test]
    fn equal_top_weights_keep_the_earliest_rule() {
        // greeting and goodbye both carry 0.9; greeting is declared first.
        let result = classifier().classify("hi and bye");
        assert_eq!(result.intent, Intent::Greeting);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn higher_weight_wins_over_earlier_match() {
        // "help" (0.8) matches first, but the apply_how rule (0.95) outranks it.
        let result = classifier().classify("help me apply for a charging station");
        assert_eq!(result.intent, Intent::ApplyHow);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn message_after_dash_separator_is_extracted() {
        let result = classifier().classify("update APP-555123 - site survey complete");
        assert_eq!(result.intent, Intent::ProgressUpdate);
        assert_eq!(result.slots.message.as_deref(), Some("site survey complete"));
    }

    #[test]
    fn blank_text_after_separator_yields_no_message() {
        // The id-separator rule wins even when its capture trims to nothing;
        // there is no fallthrough to the "update" rule in that case.
        assert_eq!(classifier().extract_message("update APP-555123:   "), None);
    }

    #[test]
    fn bare_separator_without_trailing_text_is_not_a_progress_update() {
        let result = classifier().classify("update APP-555123:");
        assert_eq!(result.intent, Intent::Fallback);
        assert_eq!(result.slots.app_id, Some(app_id("APP-555123")));
        assert!(result.slots.message.is_none());
    }

    #[test]
    fn message_falls_back_to_text_after_update_keyword() {
        let result = classifier().classify("record a progress note for APP-555123 update, permit approved");
        assert_eq!(result.intent, Intent::ProgressUpdate);
        assert_eq!(result.slots.message.as_deref(), Some("permit approved"));
    }

    #[test]
    fn progress_update_without_message_keeps_incomplete_slots() {
        let result = classifier().classify("log a progress note on APP-987654");
        assert_eq!(result.intent, Intent::ProgressUpdate);
        assert_eq!(result.slots.app_id, Some(app_id("APP-987654")));
        assert!(result.slots.message.is_none());
    }

    #[test]
    fn intents_serialize_to_snake_case_labels() {
        let serialized = serde_json::to_string(&Intent::FaqFindStation).expect("serializes");
        assert_eq!(serialized, "\"faq_find_station\"");
        assert_eq!(Intent::StatusCheck.label(), "status_check");
        assert_eq!(Intent::StatusCheck.to_string(), "status_check");
    }

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        assert_eq!(round_confidence(0.955_000_1), 0.96);
        assert_eq!(round_confidence(0.1), 0.1);
    }

    #[test]
    fn faq_intents_classify_from_example_phrasings() {
        let cases = [
            ("where can I find a charging station near me?", Intent::FaqFindStation, 0.92),
            ("how much does it cost to charge an EV?", Intent::FaqCost, 0.9),
            ("what hours are public charging stations open?", Intent::FaqHours, 0.85),
            ("are there grants or rebates available?", Intent::FaqIncentives, 0.88),
            ("what are the technical requirements for chargers?", Intent::FaqRequirements, 0.88),
            ("how to apply to set up an ev charging station?", Intent::ApplyHow, 0.95),
        ];
        for (text, intent, confidence) in cases {
            let result = classifier().classify(text);
            assert_eq!(result.intent, intent, "text: {text}");
            assert_eq!(result.confidence, confidence, "text: {text}");
        }
    }

    #[test]
    fn status_phrase_without_id_uses_lower_weight_rule() {
        let result = classifier().classify("what is the status of my application?");
        assert_eq!(result.intent, Intent::StatusCheck);
        assert_eq!(result.confidence, 0.75);
        assert!(result.slots.app_id.is_none());
    }
}
