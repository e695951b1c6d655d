//! Error types for the action engine.

use crate::types::Collaborator;

/// Errors from collaborator calls and handler-side validation.
///
/// None of these reach the user as a failure status: the dispatcher turns
/// every variant into a reply sentence.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{collaborator} call failed: {message}")]
    ExternalCall {
        collaborator: Collaborator,
        message: String,
    },
    #[error("Payload validation failed: {0}")]
    InvalidPayload(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{0} is not configured")]
    Unavailable(Collaborator),
    #[error("Action execution timed out after {0} seconds")]
    Timeout(u64),
}

impl ActionError {
    /// Wrap any displayable failure as an external call failure.
    pub fn external(collaborator: Collaborator, err: impl std::fmt::Display) -> Self {
        ActionError::ExternalCall {
            collaborator,
            message: err.to_string(),
        }
    }

    /// Map a `reqwest` failure, keeping timeouts distinct.
    pub(crate) fn from_http(
        collaborator: Collaborator,
        err: reqwest::Error,
        timeout_secs: u64,
    ) -> Self {
        if err.is_timeout() {
            ActionError::Timeout(timeout_secs)
        } else {
            ActionError::external(collaborator, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::external(Collaborator::Weather, "connection reset");
        assert_eq!(
            err.to_string(),
            "weather service call failed: connection reset"
        );

        let err = ActionError::InvalidPayload("city must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Payload validation failed: city must not be empty"
        );

        let err = ActionError::NotFound("atlantis".to_string());
        assert_eq!(err.to_string(), "Not found: atlantis");

        let err = ActionError::Unavailable(Collaborator::LanguageModel);
        assert_eq!(err.to_string(), "language model is not configured");

        let err = ActionError::Timeout(30);
        assert_eq!(
            err.to_string(),
            "Action execution timed out after 30 seconds"
        );
    }

    #[test]
    fn test_external_keeps_collaborator() {
        let err = ActionError::external(Collaborator::Mail, "auth rejected");
        match err {
            ActionError::ExternalCall {
                collaborator,
                message,
            } => {
                assert_eq!(collaborator, Collaborator::Mail);
                assert_eq!(message, "auth rejected");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_for_every_collaborator() {
        for c in [
            Collaborator::LanguageModel,
            Collaborator::Weather,
            Collaborator::AppLauncher,
            Collaborator::UrlOpener,
            Collaborator::Mail,
        ] {
            let msg = ActionError::Unavailable(c).to_string();
            assert!(msg.starts_with(&c.to_string()));
            assert!(msg.ends_with("is not configured"));
        }
    }
}
