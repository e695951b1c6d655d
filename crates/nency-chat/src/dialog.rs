//! Email composition dialog.
//!
//! A three-state machine (Idle -> AwaitingSubject -> AwaitingBody -> Idle)
//! owned by one session. While it is not idle, every utterance is taken
//! literally as the next field of the draft. The machine performs no I/O:
//! a completed draft is handed back to the caller as
//! [`DialogOutcome::Send`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SUBJECT_PROMPT_PREFIX: &str = "I'll help you send an email to";
pub const BODY_PROMPT: &str = "Great! Now, what's your message?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    AwaitingSubject,
    AwaitingBody,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Idle => write!(f, "idle"),
            DialogState::AwaitingSubject => write!(f, "awaiting_subject"),
            DialogState::AwaitingBody => write!(f, "awaiting_body"),
        }
    }
}

/// Validate a dialog state transition.
///
/// Valid transitions:
/// - Idle -> AwaitingSubject (compose)
/// - AwaitingSubject -> AwaitingBody (subject given)
/// - AwaitingBody -> Idle (body given, draft sent)
/// - AwaitingSubject -> Idle (cancelled)
pub fn validate_transition(from: DialogState, to: DialogState) -> Result<(), DialogError> {
    let valid = matches!(
        (from, to),
        (DialogState::Idle, DialogState::AwaitingSubject)
            | (DialogState::AwaitingSubject, DialogState::AwaitingBody)
            | (DialogState::AwaitingBody, DialogState::Idle)
            | (DialogState::AwaitingSubject, DialogState::Idle)
    );

    if valid {
        Ok(())
    } else {
        Err(DialogError::InvalidTransition { from, to })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("invalid dialog transition: {from} -> {to}")]
    InvalidTransition { from: DialogState, to: DialogState },
    #[error("no recipient given")]
    MissingRecipient,
    #[error("no email is being composed")]
    NotActive,
    #[error("dialog is {0} but holds no draft")]
    MissingDraft(DialogState),
}

/// In-progress email. Fields fill in as the dialog advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub recipient: String,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl EmailDraft {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: None,
            body: None,
        }
    }

    /// The finished email, if both subject and body are present.
    pub fn into_outgoing(self) -> Option<OutgoingEmail> {
        Some(OutgoingEmail {
            recipient: self.recipient,
            subject: self.subject?,
            body: self.body?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Ask the user for the next field.
    Prompt(String),
    /// The draft is complete and must be sent exactly once.
    Send(OutgoingEmail),
    /// The draft was discarded.
    Cancelled(EmailDraft),
    /// Cancel was requested while idle.
    NothingToCancel,
}

/// One session's dialog: its state plus the draft it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    state: DialogState,
    draft: Option<EmailDraft>,
}

impl Dialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        self.draft.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state != DialogState::Idle
    }

    /// Start composing an email to `recipient`.
    pub fn begin(&mut self, recipient: &str) -> Result<DialogOutcome, DialogError> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(DialogError::MissingRecipient);
        }

        self.transition(DialogState::AwaitingSubject)?;
        self.draft = Some(EmailDraft::new(recipient));

        Ok(DialogOutcome::Prompt(format!(
            "{} {}. What's the subject?",
            SUBJECT_PROMPT_PREFIX, recipient
        )))
    }

    /// Feed the next utterance into the draft.
    pub fn step(&mut self, utterance: &str) -> Result<DialogOutcome, DialogError> {
        let text = utterance.trim().to_string();

        match self.state {
            DialogState::Idle => Err(DialogError::NotActive),
            DialogState::AwaitingSubject => {
                let draft = self
                    .draft
                    .as_mut()
                    .ok_or(DialogError::MissingDraft(self.state))?;
                draft.subject = Some(text);
                self.transition(DialogState::AwaitingBody)?;
                Ok(DialogOutcome::Prompt(BODY_PROMPT.to_string()))
            }
            DialogState::AwaitingBody => {
                let mut draft = self
                    .draft
                    .take()
                    .ok_or(DialogError::MissingDraft(self.state))?;
                draft.body = Some(text);
                self.transition(DialogState::Idle)?;
                draft
                    .into_outgoing()
                    .map(DialogOutcome::Send)
                    .ok_or(DialogError::MissingDraft(DialogState::AwaitingBody))
            }
        }
    }

    /// Discard the draft and return to idle.
    pub fn cancel(&mut self) -> Result<DialogOutcome, DialogError> {
        match self.state {
            DialogState::Idle => Ok(DialogOutcome::NothingToCancel),
            DialogState::AwaitingSubject => {
                self.transition(DialogState::Idle)?;
                let draft = self
                    .draft
                    .take()
                    .ok_or(DialogError::MissingDraft(DialogState::AwaitingSubject))?;
                Ok(DialogOutcome::Cancelled(draft))
            }
            DialogState::AwaitingBody => {
                // Body -> Idle is the send edge; cancelling reuses it.
                self.transition(DialogState::Idle)?;
                let draft = self
                    .draft
                    .take()
                    .ok_or(DialogError::MissingDraft(DialogState::AwaitingBody))?;
                Ok(DialogOutcome::Cancelled(draft))
            }
        }
    }

    fn transition(&mut self, to: DialogState) -> Result<(), DialogError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = %self.state, to = %to, "Dialog transition");
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DialogState; 3] = [
        DialogState::Idle,
        DialogState::AwaitingSubject,
        DialogState::AwaitingBody,
    ];

    #[test]
    fn test_full_flow() {
        let mut dialog = Dialog::new();
        assert_eq!(dialog.state(), DialogState::Idle);

        let outcome = dialog.begin("bob@x.com").unwrap();
        assert_eq!(
            outcome,
            DialogOutcome::Prompt(
                "I'll help you send an email to bob@x.com. What's the subject?".to_string()
            )
        );
        assert_eq!(dialog.state(), DialogState::AwaitingSubject);

        let outcome = dialog.step("Hello").unwrap();
        assert_eq!(outcome, DialogOutcome::Prompt(BODY_PROMPT.to_string()));
        assert_eq!(dialog.state(), DialogState::AwaitingBody);
        assert_eq!(
            dialog.draft().and_then(|d| d.subject.as_deref()),
            Some("Hello")
        );

        let outcome = dialog.step("See you").unwrap();
        assert_eq!(
            outcome,
            DialogOutcome::Send(OutgoingEmail {
                recipient: "bob@x.com".to_string(),
                subject: "Hello".to_string(),
                body: "See you".to_string(),
            })
        );
        assert_eq!(dialog.state(), DialogState::Idle);
        assert!(dialog.draft().is_none());
    }

    #[test]
    fn test_utterances_are_taken_literally() {
        let mut dialog = Dialog::new();
        dialog.begin("bob@x.com").unwrap();
        dialog.step("search for cats").unwrap();
        let outcome = dialog.step("  open example.com  ").unwrap();
        match outcome {
            DialogOutcome::Send(email) => {
                assert_eq!(email.subject, "search for cats");
                assert_eq!(email.body, "open example.com");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_begin_requires_recipient() {
        let mut dialog = Dialog::new();
        assert_eq!(dialog.begin("   "), Err(DialogError::MissingRecipient));
        assert_eq!(dialog.state(), DialogState::Idle);
    }

    #[test]
    fn test_begin_while_active_is_invalid() {
        let mut dialog = Dialog::new();
        dialog.begin("bob@x.com").unwrap();
        let err = dialog.begin("alice@y.com").unwrap_err();
        assert_eq!(
            err,
            DialogError::InvalidTransition {
                from: DialogState::AwaitingSubject,
                to: DialogState::AwaitingSubject,
            }
        );
        assert_eq!(dialog.draft().map(|d| d.recipient.as_str()), Some("bob@x.com"));
    }

    #[test]
    fn test_step_while_idle() {
        let mut dialog = Dialog::new();
        assert_eq!(dialog.step("hello"), Err(DialogError::NotActive));
    }

    #[test]
    fn test_cancel_from_subject() {
        let mut dialog = Dialog::new();
        dialog.begin("bob@x.com").unwrap();
        let outcome = dialog.cancel().unwrap();
        assert_eq!(outcome, DialogOutcome::Cancelled(EmailDraft::new("bob@x.com")));
        assert_eq!(dialog.state(), DialogState::Idle);
        assert!(dialog.draft().is_none());
    }

    #[test]
    fn test_cancel_from_body_keeps_subject_in_discarded_draft() {
        let mut dialog = Dialog::new();
        dialog.begin("bob@x.com").unwrap();
        dialog.step("Hello").unwrap();
        match dialog.cancel().unwrap() {
            DialogOutcome::Cancelled(draft) => {
                assert_eq!(draft.subject.as_deref(), Some("Hello"));
                assert!(draft.body.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!dialog.is_active());
    }

    #[test]
    fn test_cancel_while_idle() {
        let mut dialog = Dialog::new();
        assert_eq!(dialog.cancel().unwrap(), DialogOutcome::NothingToCancel);
    }

    #[test]
    fn test_dialog_can_restart_after_send() {
        let mut dialog = Dialog::new();
        dialog.begin("bob@x.com").unwrap();
        dialog.step("a").unwrap();
        dialog.step("b").unwrap();
        assert!(dialog.begin("carol@z.com").is_ok());
        assert_eq!(dialog.state(), DialogState::AwaitingSubject);
    }

    #[test]
    fn test_validate_transition_table() {
        let allowed = [
            (DialogState::Idle, DialogState::AwaitingSubject),
            (DialogState::AwaitingSubject, DialogState::AwaitingBody),
            (DialogState::AwaitingBody, DialogState::Idle),
            (DialogState::AwaitingSubject, DialogState::Idle),
        ];
        for from in ALL {
            for to in ALL {
                let result = validate_transition(from, to);
                if allowed.contains(&(from, to)) {
                    assert!(result.is_ok(), "{} -> {}", from, to);
                } else {
                    assert_eq!(
                        result,
                        Err(DialogError::InvalidTransition { from, to }),
                        "{} -> {}",
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn test_into_outgoing_requires_all_fields() {
        let mut draft = EmailDraft::new("bob@x.com");
        assert!(draft.clone().into_outgoing().is_none());
        draft.subject = Some("Hi".to_string());
        assert!(draft.clone().into_outgoing().is_none());
        draft.body = Some("There".to_string());
        assert!(draft.into_outgoing().is_some());
    }

    #[test]
    fn test_state_serde() {
        assert_eq!(
            serde_json::to_string(&DialogState::AwaitingSubject).unwrap(),
            "\"awaiting_subject\""
        );
        assert_eq!(DialogState::AwaitingBody.to_string(), "awaiting_body");
    }

    #[test]
    fn test_error_display() {
        let err = DialogError::InvalidTransition {
            from: DialogState::Idle,
            to: DialogState::AwaitingBody,
        };
        assert_eq!(
            err.to_string(),
            "invalid dialog transition: idle -> awaiting_body"
        );
    }
}
