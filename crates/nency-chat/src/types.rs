//! Session, history and reply types.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialog::{Dialog, DialogState};

/// One browser tab's conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Epoch seconds.
    pub started_at: i64,
    /// Epoch seconds.
    pub last_message_at: i64,
    pub message_count: u64,
    pub dialog: Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: Role,
    pub content: String,
    /// Epoch seconds.
    pub created_at: i64,
}

/// Session listing entry with RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: String,
    pub last_message_at: String,
    pub message_count: u64,
    pub dialog_state: DialogState,
}

/// What the assistant says back for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Display text, links intact.
    pub text: String,
    /// Text for speech synthesis, with URLs replaced by "link".
    pub speech: String,
    /// Dialog state after this utterance was handled.
    pub dialog_state: DialogState,
}
