//! Assistant orchestrator: the single entry point for an utterance.
//!
//! If the session's email dialog is active, the utterance feeds the dialog
//! and the classifier is never consulted. Otherwise the utterance is
//! classified; a compose-email intent opens the dialog and every other
//! intent goes to the dispatcher.

use nency_action::{classify, ActionDispatcher, ActionOutcome, Intent};
use nency_core::config::ChatConfig;
use uuid::Uuid;

use crate::dialog::{DialogError, DialogOutcome};
use crate::error::ChatError;
use crate::response::ResponseGenerator;
use crate::session::SessionStore;
use crate::types::{AssistantReply, ChatMessage, Role, SessionSummary};

const MISSING_RECIPIENT: &str = "Who should I send the email to?";
const NOTHING_TO_CANCEL: &str = "There's no email in progress to cancel.";

pub struct AssistantOrchestrator {
    dispatcher: ActionDispatcher,
    store: SessionStore,
    responses: ResponseGenerator,
    max_message_length: usize,
}

impl AssistantOrchestrator {
    pub fn new(dispatcher: ActionDispatcher, config: &ChatConfig) -> Self {
        Self {
            dispatcher,
            store: SessionStore::new(config.session_timeout_minutes, config.history_limit),
            responses: ResponseGenerator::new(),
            max_message_length: config.max_message_length,
        }
    }

    /// Handle one utterance.
    ///
    /// Returns the reply and the session id it was handled in (new when
    /// `session_id` is absent, unknown, or expired). Collaborator failures
    /// are part of the reply text, not errors.
    pub async fn handle_command(
        &self,
        command: &str,
        session_id: Option<Uuid>,
    ) -> Result<(AssistantReply, Uuid), ChatError> {
        if command.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let sid = self.store.resolve(session_id)?;
        self.store.record(sid, Role::User, command)?;

        // Blank input never fills a draft field; it is classified as unrecognized.
        // The store lock is released before any collaborator is awaited.
        let blank = command.trim().is_empty();
        let pending = self.store.with_dialog(sid, |dialog| {
            (dialog.is_active() && !blank).then(|| dialog.step(command))
        })?;

        let text = match pending {
            Some(outcome) => {
                tracing::debug!(session_id = %sid, "Utterance consumed by email dialog");
                self.finish_dialog_step(outcome?).await
            }
            None => self.classify_and_dispatch(sid, command).await?,
        };

        let reply = self.responses.reply(text, self.store.dialog_state(sid)?);
        self.store.record(sid, Role::Assistant, &reply.text)?;
        Ok((reply, sid))
    }

    /// Abandon the session's email draft, if any.
    pub fn cancel(&self, session_id: Uuid) -> Result<AssistantReply, ChatError> {
        let outcome = self.store.with_dialog(session_id, |dialog| dialog.cancel())??;
        if matches!(outcome, DialogOutcome::Cancelled(_)) {
            tracing::info!(session_id = %session_id, "Email draft cancelled");
        }
        let text = cancel_text(outcome);

        let reply = self
            .responses
            .reply(text, self.store.dialog_state(session_id)?);
        self.store
            .record(session_id, Role::Assistant, &reply.text)?;
        Ok(reply)
    }

    /// Send an email directly, outside of any dialog.
    pub async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> ActionOutcome {
        self.dispatcher.send_email(recipient, subject, body).await
    }

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.store.list()
    }

    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        self.store.remove(session_id)
    }

    pub fn history(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        self.store.history(session_id)
    }

    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }

    pub fn purge_expired(&self) -> Result<usize, ChatError> {
        self.store.purge_expired()
    }

    // -- Private helpers --

    async fn classify_and_dispatch(&self, sid: Uuid, command: &str) -> Result<String, ChatError> {
        let intent = classify(command);
        tracing::info!(session_id = %sid, kind = %intent.kind(), "Utterance classified");

        if let Intent::ComposeEmail { recipient } = &intent {
            return match self.store.with_dialog(sid, |dialog| dialog.begin(recipient))? {
                Ok(outcome) => Ok(self.finish_dialog_step(outcome).await),
                Err(DialogError::MissingRecipient) => Ok(MISSING_RECIPIENT.to_string()),
                Err(e) => Err(e.into()),
            };
        }

        Ok(self.dispatcher.dispatch(&intent).await.message)
    }

    async fn finish_dialog_step(&self, outcome: DialogOutcome) -> String {
        match outcome {
            DialogOutcome::Prompt(prompt) => prompt,
            DialogOutcome::Send(email) => {
                self.dispatcher
                    .send_email(&email.recipient, &email.subject, &email.body)
                    .await
                    .message
            }
            other => cancel_text(other),
        }
    }
}

fn cancel_text(outcome: DialogOutcome) -> String {
    match outcome {
        DialogOutcome::Cancelled(draft) => {
            format!("Okay, I've cancelled the email to {}.", draft.recipient)
        }
        _ => NOTHING_TO_CANCEL.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
