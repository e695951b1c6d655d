//! Error types for the conversational layer.

use crate::dialog::DialogError;

/// Errors from the chat layer.
///
/// Collaborator failures are not here: they become reply text before they
/// reach this layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("dialog error: {0}")]
    Dialog(#[from] DialogError),
    #[error("storage error: {0}")]
    StorageError(String),
}
