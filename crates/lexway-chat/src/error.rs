//! Error types for the chat engine.

use lexway_core::error::LexwayError;
use lexway_provider::ProviderError;

use crate::normalize::NormalizeError;

/// Errors from one chat exchange.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("malformed provider response: {reason}")]
    MalformedResponse { reason: String, raw: String },
    #[error("session store error: {0}")]
    Store(String),
}

impl From<NormalizeError> for ChatError {
    fn from(err: NormalizeError) -> Self {
        ChatError::MalformedResponse {
            reason: err.reason,
            raw: err.raw,
        }
    }
}

impl From<LexwayError> for ChatError {
    fn from(err: LexwayError) -> Self {
        ChatError::Store(err.to_string())
    }
}
