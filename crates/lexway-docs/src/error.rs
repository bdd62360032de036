//! Error types for the document flows.

use lexway_chat::NormalizeError;
use lexway_provider::ProviderError;

/// Errors from document analysis or text extraction.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("malformed provider response: {reason}")]
    MalformedResponse { reason: String, raw: String },
}

impl From<NormalizeError> for DocsError {
    fn from(err: NormalizeError) -> Self {
        DocsError::MalformedResponse {
            reason: err.reason,
            raw: err.raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err: DocsError = ProviderError::RateLimit.into();
        assert!(err.to_string().contains("rate limit"));

        let err = DocsError::MalformedResponse {
            reason: "truncated".to_string(),
            raw: "{".to_string(),
        };
        assert_eq!(err.to_string(), "malformed provider response: truncated");
    }

    #[test]
    fn test_from_normalize_error_keeps_raw() {
        let err: DocsError = NormalizeError {
            reason: "eof".to_string(),
            raw: "{\"summary\":".to_string(),
        }
        .into();
        match err {
            DocsError::MalformedResponse { raw, .. } => assert_eq!(raw, "{\"summary\":"),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }
}
