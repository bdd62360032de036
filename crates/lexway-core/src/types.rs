//! Core domain types shared across Lexway crates.
//!
//! A conversation is an ordered list of [`Turn`]s keyed by an opaque session
//! id. Each turn may carry the jurisdiction inferred so far and, once the
//! model decides enough facts are gathered, a full guidance report. The
//! `legal_guidance_generation` flag on a reply is the single source of truth
//! for which phase the conversation is in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Jurisdiction inferred for the user's situation.
///
/// Populated once the locating phase completes and carried forward on every
/// subsequent turn. The model is allowed to revise it later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Localization {
    pub country: String,
    pub legal_system: String,
    pub jurisdiction: String,
    pub legal_domain: String,
}

impl Localization {
    /// True when no field carries any content.
    pub fn is_empty(&self) -> bool {
        self.country.is_empty()
            && self.legal_system.is_empty()
            && self.jurisdiction.is_empty()
            && self.legal_domain.is_empty()
    }

    /// True when every field carries content.
    pub fn is_complete(&self) -> bool {
        !self.country.is_empty()
            && !self.legal_system.is_empty()
            && !self.jurisdiction.is_empty()
            && !self.legal_domain.is_empty()
    }
}

/// Forward-looking projection attached to a guidance report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnticipationProjection {
    pub next_steps_if_action_fails: String,
    pub typical_outcome: String,
    pub estimated_timeline: String,
}

impl AnticipationProjection {
    pub fn is_empty(&self) -> bool {
        self.next_steps_if_action_fails.is_empty()
            && self.typical_outcome.is_empty()
            && self.estimated_timeline.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.next_steps_if_action_fails.is_empty()
            && !self.typical_outcome.is_empty()
            && !self.estimated_timeline.is_empty()
    }
}

/// Structured guidance report, populated exactly when the reply's
/// `legal_guidance_generation` flag is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guidance {
    pub current_situation: String,
    pub priority_action: String,
    pub what_to_avoid: Vec<String>,
    pub consequences_of_inaction: String,
    pub anticipation_projection: AnticipationProjection,
}

impl Guidance {
    /// True when no field carries any content (question-phase placeholder).
    pub fn is_empty(&self) -> bool {
        self.current_situation.is_empty()
            && self.priority_action.is_empty()
            && self.what_to_avoid.iter().all(|s| s.is_empty())
            && self.consequences_of_inaction.is_empty()
            && self.anticipation_projection.is_empty()
    }

    /// True when every field (including the projection) carries content.
    pub fn is_complete(&self) -> bool {
        !self.current_situation.is_empty()
            && !self.priority_action.is_empty()
            && !self.what_to_avoid.is_empty()
            && self.what_to_avoid.iter().all(|s| !s.is_empty())
            && !self.consequences_of_inaction.is_empty()
            && self.anticipation_projection.is_complete()
    }
}

/// One user/assistant exchange within a session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_message: String,
    pub ai_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_guidance: Option<Guidance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization: Option<Localization>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a question-phase or guidance-phase turn, stamped now.
    pub fn new(
        user_message: String,
        ai_message: String,
        legal_guidance: Option<Guidance>,
        localization: Option<Localization>,
    ) -> Self {
        Self {
            user_message,
            ai_message,
            legal_guidance,
            localization,
            created_at: Utc::now(),
        }
    }

    /// True while the assistant is still asking clarifying questions.
    pub fn is_question_phase(&self) -> bool {
        self.legal_guidance.is_none()
    }
}

/// Progress of a conversation toward producing a guidance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationPhase {
    /// Jurisdiction unknown.
    Locate,
    /// Jurisdiction known, case-specific facts missing.
    Diagnose,
    /// Sufficient information gathered; guidance emitted.
    Guide,
}

impl ConversationPhase {
    /// Derive the phase from stored turns.
    ///
    /// Guidance on the latest turn wins; otherwise any known localization
    /// means the conversation is diagnosing.
    pub fn of_turns(turns: &[Turn]) -> Self {
        if turns.last().is_some_and(|t| t.legal_guidance.is_some()) {
            return ConversationPhase::Guide;
        }
        if turns.iter().any(|t| t.localization.is_some()) {
            return ConversationPhase::Diagnose;
        }
        ConversationPhase::Locate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_localization() -> Localization {
        Localization {
            country: "France".to_string(),
            legal_system: "Civil Law".to_string(),
            jurisdiction: "Conseil de prud'hommes".to_string(),
            legal_domain: "Employment Law".to_string(),
        }
    }

    fn full_guidance() -> Guidance {
        Guidance {
            current_situation: "The employee is favored".to_string(),
            priority_action: "Send a registered letter".to_string(),
            what_to_avoid: vec!["Signing a waiver".to_string()],
            consequences_of_inaction: "Claim becomes time-barred".to_string(),
            anticipation_projection: AnticipationProjection {
                next_steps_if_action_fails: "File with the labor tribunal".to_string(),
                typical_outcome: "Settlement".to_string(),
                estimated_timeline: "3-6 months".to_string(),
            },
        }
    }

    // ---- Localization ----

    #[test]
    fn test_localization_default_is_empty() {
        let loc = Localization::default();
        assert!(loc.is_empty());
        assert!(!loc.is_complete());
    }

    #[test]
    fn test_localization_complete() {
        let loc = full_localization();
        assert!(!loc.is_empty());
        assert!(loc.is_complete());
    }

    #[test]
    fn test_localization_partial_is_neither() {
        let loc = Localization {
            country: "France".to_string(),
            ..Localization::default()
        };
        assert!(!loc.is_empty());
        assert!(!loc.is_complete());
    }

    // ---- Guidance ----

    #[test]
    fn test_guidance_default_is_empty() {
        let g = Guidance::default();
        assert!(g.is_empty());
        assert!(!g.is_complete());
    }

    #[test]
    fn test_guidance_complete() {
        let g = full_guidance();
        assert!(!g.is_empty());
        assert!(g.is_complete());
    }

    #[test]
    fn test_guidance_empty_avoid_list_not_complete() {
        let mut g = full_guidance();
        g.what_to_avoid.clear();
        assert!(!g.is_complete());
    }

    #[test]
    fn test_guidance_blank_avoid_entry_not_complete() {
        let mut g = full_guidance();
        g.what_to_avoid.push(String::new());
        assert!(!g.is_complete());
    }

    #[test]
    fn test_guidance_missing_projection_not_complete() {
        let mut g = full_guidance();
        g.anticipation_projection = AnticipationProjection::default();
        assert!(!g.is_complete());
    }

    #[test]
    fn test_guidance_with_only_blank_avoid_entries_is_empty() {
        let g = Guidance {
            what_to_avoid: vec![String::new(), String::new()],
            ..Guidance::default()
        };
        assert!(g.is_empty());
    }

    // ---- Turn ----

    #[test]
    fn test_question_turn_has_no_guidance() {
        let t = Turn::new("Hi".to_string(), "Where are you?".to_string(), None, None);
        assert!(t.is_question_phase());
    }

    #[test]
    fn test_guidance_turn_is_not_question_phase() {
        let t = Turn::new(
            "Facts".to_string(),
            "Here is your guidance".to_string(),
            Some(full_guidance()),
            Some(full_localization()),
        );
        assert!(!t.is_question_phase());
    }

    #[test]
    fn test_turn_serde_round_trip() {
        let t = Turn::new(
            "Facts".to_string(),
            "Guidance".to_string(),
            Some(full_guidance()),
            Some(full_localization()),
        );
        let json = serde_json::to_string(&t).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_turn_omits_absent_optional_fields() {
        let t = Turn::new("Hi".to_string(), "Where?".to_string(), None, None);
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("legal_guidance"));
        assert!(!json.contains("localization"));
    }

    #[test]
    fn test_turn_deserializes_without_timestamp() {
        // Records written before timestamps were recorded still load.
        let json = r#"{"user_message":"Hi","ai_message":"Where?"}"#;
        let t: Turn = serde_json::from_str(json).unwrap();
        assert_eq!(t.user_message, "Hi");
        assert!(t.legal_guidance.is_none());
    }

    // ---- Phase derivation ----

    #[test]
    fn test_phase_of_empty_conversation_is_locate() {
        assert_eq!(ConversationPhase::of_turns(&[]), ConversationPhase::Locate);
    }

    #[test]
    fn test_phase_before_localization_is_locate() {
        let turns = vec![Turn::new("Hi".into(), "Which country?".into(), None, None)];
        assert_eq!(
            ConversationPhase::of_turns(&turns),
            ConversationPhase::Locate
        );
    }

    #[test]
    fn test_phase_after_localization_is_diagnose() {
        let turns = vec![
            Turn::new("Hi".into(), "Which country?".into(), None, None),
            Turn::new(
                "France".into(),
                "Permanent or fixed-term contract?".into(),
                None,
                Some(full_localization()),
            ),
        ];
        assert_eq!(
            ConversationPhase::of_turns(&turns),
            ConversationPhase::Diagnose
        );
    }

    #[test]
    fn test_phase_with_guidance_is_guide() {
        let turns = vec![
            Turn::new("Hi".into(), "Which country?".into(), None, None),
            Turn::new(
                "France, CDI".into(),
                "Guidance".into(),
                Some(full_guidance()),
                Some(full_localization()),
            ),
        ];
        assert_eq!(ConversationPhase::of_turns(&turns), ConversationPhase::Guide);
    }

    #[test]
    fn test_phase_guidance_only_counts_on_latest_turn() {
        // A follow-up question after a report puts the conversation back
        // into a questioning phase.
        let turns = vec![
            Turn::new(
                "France, CDI".into(),
                "Guidance".into(),
                Some(full_guidance()),
                Some(full_localization()),
            ),
            Turn::new(
                "What about severance?".into(),
                "When were you notified?".into(),
                None,
                Some(full_localization()),
            ),
        ];
        assert_eq!(
            ConversationPhase::of_turns(&turns),
            ConversationPhase::Diagnose
        );
    }
}
