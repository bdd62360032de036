//! The response shape contract for guidance conversations.
//!
//! Every provider call is constrained by a declared JSON schema, and the
//! parsed reply is validated locally before it is trusted: a reply is
//! either a single clarifying question (flag false, guidance empty) or a
//! fully populated guidance report (flag true, every field filled). The
//! `legal_guidance_generation` flag is the single source of truth for the
//! conversation phase.

use serde::{Deserialize, Serialize};
use serde_json::json;

use lexway_core::types::{Guidance, Localization};
use lexway_provider::ShapeSpec;

/// Declared output shape for one chat turn.
pub fn chat_shape() -> ShapeSpec {
    ShapeSpec::new(
        "legal_chat_reply",
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Either a single clarifying question or the guidance synthesis"
                },
                "localization": {
                    "type": "object",
                    "properties": {
                        "country": { "type": "string" },
                        "legal_system": { "type": "string" },
                        "jurisdiction": { "type": "string" },
                        "legal_domain": { "type": "string" }
                    },
                    "required": ["country", "legal_system", "jurisdiction", "legal_domain"],
                    "additionalProperties": false
                },
                "legal_guidance": {
                    "type": "object",
                    "properties": {
                        "current_situation": { "type": "string" },
                        "priority_action": { "type": "string" },
                        "what_to_avoid": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "consequences_of_inaction": { "type": "string" },
                        "anticipation_projection": {
                            "type": "object",
                            "properties": {
                                "next_steps_if_action_fails": { "type": "string" },
                                "typical_outcome": { "type": "string" },
                                "estimated_timeline": { "type": "string" }
                            },
                            "required": [
                                "next_steps_if_action_fails",
                                "typical_outcome",
                                "estimated_timeline"
                            ],
                            "additionalProperties": false
                        }
                    },
                    "required": [
                        "current_situation",
                        "priority_action",
                        "what_to_avoid",
                        "consequences_of_inaction",
                        "anticipation_projection"
                    ],
                    "additionalProperties": false
                },
                "legal_guidance_generation": {
                    "type": "boolean",
                    "description": "False while asking questions, true when legal_guidance is populated"
                }
            },
            "required": [
                "message",
                "localization",
                "legal_guidance",
                "legal_guidance_generation"
            ],
            "additionalProperties": false
        }),
    )
}

/// One parsed chat reply.
///
/// Strict provider schemas always emit the `localization` and
/// `legal_guidance` objects, so question-phase replies carry them with
/// empty fields; [`ChatReply::canonicalize`] collapses those placeholders
/// to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub localization: Option<Localization>,
    #[serde(default)]
    pub legal_guidance: Option<Guidance>,
    #[serde(default)]
    pub legal_guidance_generation: bool,
}

impl ChatReply {
    /// Collapse empty placeholder objects into absent fields.
    pub fn canonicalize(mut self) -> Self {
        if self.localization.as_ref().is_some_and(Localization::is_empty) {
            self.localization = None;
        }
        if self.legal_guidance.as_ref().is_some_and(Guidance::is_empty) {
            self.legal_guidance = None;
        }
        self
    }
}

/// Validate a canonicalized reply against the phase contract.
///
/// Returns the violation description on failure. Content-level policies
/// (one question per turn, the diagnose-question bound) are prompt
/// instructions and are deliberately not checked here.
pub fn validate(reply: &ChatReply) -> Result<(), String> {
    if reply.message.trim().is_empty() {
        return Err("message is empty".to_string());
    }

    if reply.legal_guidance_generation {
        let Some(guidance) = &reply.legal_guidance else {
            return Err("guidance flag is set but legal_guidance is empty".to_string());
        };
        if !guidance.is_complete() {
            return Err("guidance flag is set but legal_guidance is incomplete".to_string());
        }
        let Some(localization) = &reply.localization else {
            return Err("guidance flag is set but localization is empty".to_string());
        };
        if !localization.is_complete() {
            return Err("guidance flag is set but localization is incomplete".to_string());
        }
    } else if reply.legal_guidance.is_some() {
        return Err("legal_guidance populated while still asking questions".to_string());
    }

    Ok(())
}
