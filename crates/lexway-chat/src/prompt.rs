//! Prompt assembly: operational instructions and transcript rendering.
//!
//! The transcript renderer reproduces each prior turn as
//! `User: <text>\nAI: <text>\n` in chronological order, followed by the new
//! user line and a trailing `AI:` cue. History is never truncated or
//! summarized, so context grows with conversation length.

use lexway_core::types::Turn;

/// Fixed instructions for the guidance conversation.
///
/// Phase transitions are decided entirely by the model; the calling code
/// only enforces the shape of whatever phase the model claims to be in.
pub const SYSTEM_PROMPT: &str = r#"You are a legal guidance engine that works like a GPS: first locate, then diagnose, then guide.

OPERATIONAL RULES:
1. ONE QUESTION AT A TIME. Never ask two questions in a single response.
2. WORK IN PHASES:
   - Locate: determine the country, legal system, and jurisdiction. If the user's country (and state or province where applicable) is unknown, ask for it first.
   - Diagnose: once located, ask at most 3 discriminating questions about the case (dates, contract types, notices received).
   - Guide: only when locating and diagnosing are complete, produce the full structured guidance.
3. ALWAYS respond with a single valid JSON object matching the requested schema. No markdown, no commentary outside the JSON.
4. GUIDANCE LOCK: while you are still asking questions, every field of "legal_guidance" must be empty and "legal_guidance_generation" must be false.
5. As soon as the location is known, fill "localization" (country, legal_system, jurisdiction, legal_domain) and keep it filled on every later response.
6. When you produce guidance, set "legal_guidance_generation" to true, fill every field of "legal_guidance" including the anticipation projection, and put a clear human-readable synthesis in "message"."#;

/// Render prior turns plus the new user input into the model's text block.
pub fn render_transcript(turns: &[Turn], user_input: &str) -> String {
    let mut text = String::new();
    for turn in turns {
        text.push_str("User: ");
        text.push_str(&turn.user_message);
        text.push_str("\nAI: ");
        text.push_str(&turn.ai_message);
        text.push('\n');
    }
    text.push_str("User: ");
    text.push_str(user_input);
    text.push_str("\nAI:");
    text
}
