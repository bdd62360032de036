//! Chat engine: central coordinator wiring store, prompt, provider, and
//! the response shape contract.
//!
//! One exchange runs: session lookup -> transcript render -> provider call
//! under the declared shape -> normalize -> validate -> append turn ->
//! rewrite store. Nothing is persisted when any step fails, so a failed
//! exchange leaves the session exactly as it was.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use lexway_core::types::{ConversationPhase, Turn};
use lexway_provider::{CompletionRequest, ProviderAdapter};
use lexway_store::SessionStore;

use crate::contract::{chat_shape, validate, ChatReply};
use crate::error::ChatError;
use crate::normalize::normalize;
use crate::prompt::{render_transcript, SYSTEM_PROMPT};

/// Advisory bound on diagnose-phase questions; exceeded turns are logged,
/// not rejected, since the model owns phase transitions.
const DIAGNOSE_QUESTION_CAP: usize = 3;

/// Outcome of one successful exchange.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// The session the turn was appended to (new or existing).
    pub session_id: String,
    pub reply: ChatReply,
}

/// Coordinates one guidance conversation turn end to end.
pub struct ChatEngine {
    provider: Arc<dyn ProviderAdapter>,
    store: Arc<dyn SessionStore>,
}

impl ChatEngine {
    pub fn new(provider: Arc<dyn ProviderAdapter>, store: Arc<dyn SessionStore>) -> Self {
        Self { provider, store }
    }

    /// Handle an incoming chat message.
    ///
    /// Returns the validated reply and the session id (minted when the
    /// caller supplied none).
    pub async fn chat(
        &self,
        session_id: Option<&str>,
        user_input: &str,
    ) -> Result<ChatOutcome, ChatError> {
        if user_input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (id, mut turns) = self.resolve_session(session_id)?;
        debug!(session = %id, prior_turns = turns.len(), "Handling chat message");

        let request = CompletionRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            user_text: render_transcript(&turns, user_input),
            attachment: None,
            shape: chat_shape(),
        };
        let raw = self.provider.complete(request).await?;

        let reply = normalize::<ChatReply>(&raw)?.canonicalize();
        validate(&reply).map_err(|reason| ChatError::MalformedResponse { reason, raw })?;

        turns.push(Turn::new(
            user_input.to_string(),
            reply.message.clone(),
            reply.legal_guidance.clone(),
            reply.localization.clone(),
        ));
        self.warn_if_over_diagnose_cap(&id, &turns);
        let phase = ConversationPhase::of_turns(&turns);

        self.store
            .put(&id, turns)
            .map_err(|e| ChatError::Store(e.to_string()))?;

        info!(session = %id, ?phase, "Turn appended");
        Ok(ChatOutcome {
            session_id: id,
            reply,
        })
    }

    /// Resolve the session to continue.
    ///
    /// An unknown id is kept and starts a fresh conversation under that
    /// key; a missing id mints a new opaque identifier.
    fn resolve_session(&self, session_id: Option<&str>) -> Result<(String, Vec<Turn>), ChatError> {
        match session_id {
            Some(id) => {
                let turns = self
                    .store
                    .get(id)
                    .map_err(|e| ChatError::Store(e.to_string()))?
                    .unwrap_or_default();
                Ok((id.to_string(), turns))
            }
            None => Ok((Uuid::new_v4().to_string(), Vec::new())),
        }
    }

    /// Advisory check on the diagnose-question bound.
    ///
    /// Counts question turns from the first localized turn onward; the cap
    /// is a prompt-level policy, so a breach is logged and the turn kept.
    fn warn_if_over_diagnose_cap(&self, session_id: &str, turns: &[Turn]) {
        let Some(first_localized) = turns.iter().position(|t| t.localization.is_some()) else {
            return;
        };
        let questions = turns[first_localized..]
            .iter()
            .filter(|t| t.is_question_phase())
            .count();
        if questions > DIAGNOSE_QUESTION_CAP {
            warn!(
                session = %session_id,
                questions,
                cap = DIAGNOSE_QUESTION_CAP,
                "Model exceeded the diagnose-question bound"
            );
        }
    }
}
