//! Error types for the provider boundary.

use thiserror::Error;

/// Failures from the external LLM/file service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication rejected by provider")]
    Authentication,
    #[error("provider rate limit exceeded")]
    RateLimit,
    #[error("provider call timed out")]
    Timeout,
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned no usable content")]
    EmptyResponse,
}

impl ProviderError {
    /// Map an HTTP error status and response body to a domain error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication,
            429 => ProviderError::RateLimit,
            _ => ProviderError::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(
            ProviderError::from_status(401, "bad key".into()),
            ProviderError::Authentication
        ));
        assert!(matches!(
            ProviderError::from_status(403, "forbidden".into()),
            ProviderError::Authentication
        ));
    }

    #[test]
    fn test_from_status_rate_limit() {
        assert!(matches!(
            ProviderError::from_status(429, "slow down".into()),
            ProviderError::RateLimit
        ));
    }

    #[test]
    fn test_from_status_other() {
        let err = ProviderError::from_status(500, "boom".into());
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProviderError::Timeout.to_string(),
            "provider call timed out"
        );
        assert_eq!(
            ProviderError::Api {
                status: 502,
                message: "bad gateway".into()
            }
            .to_string(),
            "provider returned 502: bad gateway"
        );
    }
}
