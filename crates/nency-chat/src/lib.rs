//! Conversational layer for Nency.
//!
//! Holds the per-session email dialog, the session store and message
//! history, and the orchestrator that decides whether an utterance feeds
//! the dialog or goes through classification and dispatch.

pub mod dialog;
pub mod error;
pub mod orchestrator;
pub mod response;
pub mod session;
pub mod types;

pub use dialog::{
    validate_transition, Dialog, DialogError, DialogOutcome, DialogState, EmailDraft, OutgoingEmail,
};
pub use error::ChatError;
pub use orchestrator::AssistantOrchestrator;
pub use response::ResponseGenerator;
pub use session::SessionStore;
pub use types::{AssistantReply, ChatMessage, Role, Session, SessionSummary};
