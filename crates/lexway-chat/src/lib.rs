//! Conversational guidance engine for Lexway.
//!
//! Provides transcript assembly, the phase-gated response shape contract,
//! reply normalization, and the engine that wires them to the provider
//! boundary and session store.

pub mod contract;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod prompt;

pub use contract::{chat_shape, validate, ChatReply};
pub use engine::{ChatEngine, ChatOutcome};
pub use error::ChatError;
pub use normalize::{normalize, strip_fences, NormalizeError};
pub use prompt::{render_transcript, SYSTEM_PROMPT};
