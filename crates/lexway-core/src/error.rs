use thiserror::Error;

/// Top-level error type for the Lexway system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for LexwayError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LexwayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider call failed: {0}")]
    Provider(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Session store error: {0}")]
    Store(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LexwayError {
    fn from(err: toml::de::Error) -> Self {
        LexwayError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LexwayError {
    fn from(err: toml::ser::Error) -> Self {
        LexwayError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LexwayError {
    fn from(err: serde_json::Error) -> Self {
        LexwayError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Lexway operations.
pub type Result<T> = std::result::Result<T, LexwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LexwayError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(LexwayError, &str)> = vec![
            (
                LexwayError::Provider("timed out".to_string()),
                "Provider call failed: timed out",
            ),
            (
                LexwayError::MalformedResponse("not valid JSON".to_string()),
                "Malformed provider response: not valid JSON",
            ),
            (
                LexwayError::UnsupportedFileType("application/zip".to_string()),
                "Unsupported file type: application/zip",
            ),
            (
                LexwayError::Store("disk full".to_string()),
                "Session store error: disk full",
            ),
            (
                LexwayError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LexwayError = io_err.into();
        assert!(matches!(err, LexwayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(parsed.is_err());
        let err: LexwayError = parsed.unwrap_err().into();
        assert!(matches!(err, LexwayError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(parsed.is_err());
        let err: LexwayError = parsed.unwrap_err().into();
        assert!(matches!(err, LexwayError::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(LexwayError::Store("fail".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_debug_impl() {
        let err = LexwayError::UnsupportedFileType("application/zip".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("UnsupportedFileType"));
        assert!(debug_str.contains("application/zip"));
    }
}
