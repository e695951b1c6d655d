//! Intent dispatch.
//!
//! Routes a classified [`Intent`] to its collaborator and turns the outcome,
//! success or failure, into the sentence the user hears.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::handler::url_open::search_url;
use crate::handler::Collaborators;
use crate::types::Intent;

/// The user-facing result of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Executes intents against the configured collaborators.
pub struct ActionDispatcher {
    collaborators: Collaborators,
    search_engine_url: String,
}

impl ActionDispatcher {
    pub fn new(collaborators: Collaborators, search_engine_url: impl Into<String>) -> Self {
        Self {
            collaborators,
            search_engine_url: search_engine_url.into(),
        }
    }

    /// Execute one intent. Never returns an error: failures become text.
    pub async fn dispatch(&self, intent: &Intent) -> ActionOutcome {
        let outcome = match intent {
            Intent::Search { query } => self.search(query),
            Intent::OpenSite { url } => self.open_site(url),
            Intent::OpenApp { name } => self.open_app(name),
            Intent::Weather { city } => self.weather(city).await,
            Intent::AskModel { question } => self.ask_model(question).await,
            Intent::ComposeEmail { recipient } => ActionOutcome::ok(format!(
                "I'll help you send an email to {}. Please provide the subject.",
                recipient
            )),
            Intent::Unrecognized => {
                ActionOutcome::failed("I didn't catch that. Could you say it again?")
            }
        };

        if outcome.success {
            tracing::info!(kind = %intent.kind(), "Action completed");
        } else {
            tracing::warn!(kind = %intent.kind(), message = %outcome.message, "Action failed");
        }
        outcome
    }

    /// Send a completed email and report the result as a sentence.
    pub async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> ActionOutcome {
        if recipient.trim().is_empty() {
            return ActionOutcome::failed("Failed to send email. Error: no recipient given.");
        }
        match self.collaborators.mail.send(recipient, subject, body).await {
            Ok(()) => ActionOutcome::ok(format!("Email sent successfully to {}!", recipient)),
            Err(e) => {
                tracing::warn!(recipient = %recipient, error = %e, "Email delivery failed");
                ActionOutcome::failed(format!("Failed to send email. Error: {}", e))
            }
        }
    }

    fn search(&self, query: &str) -> ActionOutcome {
        if query.trim().is_empty() {
            return ActionOutcome::failed("What should I search for?");
        }
        let opened = search_url(&self.search_engine_url, query)
            .and_then(|url| self.collaborators.opener.open(&url));
        match opened {
            Ok(()) => ActionOutcome::ok(format!("Searching for {} on Google.", query)),
            Err(e) => ActionOutcome::failed(format!(
                "Sorry, I couldn't search for {}. Error: {}",
                query, e
            )),
        }
    }

    fn open_site(&self, url: &str) -> ActionOutcome {
        match self.collaborators.opener.open(url) {
            Ok(()) => ActionOutcome::ok(format!("Opening {}.", url)),
            Err(e) => ActionOutcome::failed(format!("Sorry, I couldn't open {}. Error: {}", url, e)),
        }
    }

    fn open_app(&self, name: &str) -> ActionOutcome {
        if name.trim().is_empty() {
            return ActionOutcome::failed("Which application should I open?");
        }
        match self.collaborators.launcher.launch(name) {
            Ok(()) => ActionOutcome::ok(format!("Opening {}.", name)),
            Err(e) => {
                ActionOutcome::failed(format!("Sorry, I couldn't open {}. Error: {}", name, e))
            }
        }
    }

    async fn weather(&self, city: &str) -> ActionOutcome {
        if city.trim().is_empty() {
            return ActionOutcome::failed("Which city would you like the weather for?");
        }
        match self.collaborators.weather.current(city).await {
            Ok(report) => ActionOutcome::ok(report.describe()),
            Err(ActionError::NotFound(_)) => ActionOutcome::failed(format!(
                "Sorry, I couldn't find weather information for {}.",
                city
            )),
            Err(e) => ActionOutcome::failed(format!(
                "Sorry, I couldn't get the weather information. Error: {}",
                e
            )),
        }
    }

    async fn ask_model(&self, question: &str) -> ActionOutcome {
        match self.collaborators.model.ask(question).await {
            Ok(answer) => ActionOutcome::ok(answer),
            Err(ActionError::Unavailable(_)) => ActionOutcome::failed(
                "I'm not sure how to answer that. Gemini AI integration is not available.",
            ),
            Err(e) => ActionOutcome::failed(format!(
                "Sorry, I couldn't get a response from Gemini. Error: {}",
                e
            )),
        }
    }
}
