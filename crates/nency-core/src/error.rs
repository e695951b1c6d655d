use thiserror::Error;

/// Top-level error type for the Nency assistant.
///
/// Subsystem crates define their own error enums and convert into this one
/// (or from it) so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NencyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NencyError {
    fn from(err: toml::de::Error) -> Self {
        NencyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NencyError {
    fn from(err: toml::ser::Error) -> Self {
        NencyError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Nency operations.
pub type Result<T> = std::result::Result<T, NencyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let cases: Vec<(NencyError, &str)> = vec![
            (
                NencyError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                NencyError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NencyError = io_err.into();
        assert!(matches!(err, NencyError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let nency_err: NencyError = err.unwrap_err().into();
        assert!(matches!(nency_err, NencyError::Config(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
