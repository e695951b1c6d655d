//! Recording test doubles for every collaborator.
//!
//! Each mock records its calls and can be switched into a failing mode.
//! Used by tests here and in the chat and API crates.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{
    AppLauncher, Collaborators, LanguageModel, MailTransport, UrlOpener, WeatherService,
};
use crate::handler::url_open::validate_url;
use crate::types::{Collaborator, WeatherReport};

/// How a mock responds when called.
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    #[default]
    Succeed,
    /// Fail with an external call error carrying this message.
    Fail(String),
    /// Report the collaborator as not configured.
    Unavailable,
}

impl MockMode {
    fn check(&self, collaborator: Collaborator) -> Result<(), ActionError> {
        match self {
            MockMode::Succeed => Ok(()),
            MockMode::Fail(msg) => Err(ActionError::external(collaborator, msg)),
            MockMode::Unavailable => Err(ActionError::Unavailable(collaborator)),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Language model
// =============================================================================

#[derive(Default)]
pub struct MockLanguageModel {
    answer: Mutex<String>,
    mode: Mutex<MockMode>,
    questions: Mutex<Vec<String>>,
}

impl MockLanguageModel {
    pub fn answering(answer: &str) -> Self {
        let m = Self::default();
        *lock(&m.answer) = answer.to_string();
        m
    }

    pub fn set_mode(&self, mode: MockMode) {
        *lock(&self.mode) = mode;
    }

    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn ask(&self, question: &str) -> Result<String, ActionError> {
        lock(&self.questions).push(question.to_string());
        lock(&self.mode).check(Collaborator::LanguageModel)?;
        Ok(lock(&self.answer).clone())
    }
}

// =============================================================================
// Weather
// =============================================================================

/// Knows a fixed set of cities; anything else is `NotFound`.
#[derive(Default)]
pub struct MockWeatherService {
    reports: Mutex<Vec<WeatherReport>>,
    mode: Mutex<MockMode>,
    lookups: Mutex<Vec<String>>,
}

impl MockWeatherService {
    pub fn with_report(report: WeatherReport) -> Self {
        let m = Self::default();
        lock(&m.reports).push(report);
        m
    }

    pub fn set_mode(&self, mode: MockMode) {
        *lock(&self.mode) = mode;
    }

    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }
}

#[async_trait]
impl WeatherService for MockWeatherService {
    async fn current(&self, city: &str) -> Result<WeatherReport, ActionError> {
        lock(&self.lookups).push(city.to_string());
        lock(&self.mode).check(Collaborator::Weather)?;
        lock(&self.reports)
            .iter()
            .find(|r| r.location.eq_ignore_ascii_case(city.trim()))
            .cloned()
            .ok_or_else(|| ActionError::NotFound(city.to_string()))
    }
}

// =============================================================================
// App launcher / URL opener
// =============================================================================

#[derive(Default)]
pub struct MockAppLauncher {
    mode: Mutex<MockMode>,
    launched: Mutex<Vec<String>>,
}

impl MockAppLauncher {
    pub fn set_mode(&self, mode: MockMode) {
        *lock(&self.mode) = mode;
    }

    pub fn launched(&self) -> Vec<String> {
        lock(&self.launched).clone()
    }
}

impl AppLauncher for MockAppLauncher {
    fn launch(&self, name: &str) -> Result<(), ActionError> {
        lock(&self.mode).check(Collaborator::AppLauncher)?;
        lock(&self.launched).push(name.to_string());
        Ok(())
    }
}

/// Applies the same scheme validation as the real opener.
#[derive(Default)]
pub struct MockUrlOpener {
    mode: Mutex<MockMode>,
    opened: Mutex<Vec<String>>,
}

impl MockUrlOpener {
    pub fn set_mode(&self, mode: MockMode) {
        *lock(&self.mode) = mode;
    }

    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }
}

impl UrlOpener for MockUrlOpener {
    fn open(&self, url: &str) -> Result<(), ActionError> {
        validate_url(url)?;
        lock(&self.mode).check(Collaborator::UrlOpener)?;
        lock(&self.opened).push(url.to_string());
        Ok(())
    }
}

// =============================================================================
// Mail
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockMailTransport {
    mode: Mutex<MockMode>,
    sent: Mutex<Vec<SentMail>>,
}

impl MockMailTransport {
    pub fn set_mode(&self, mode: MockMode) {
        *lock(&self.mode) = mode;
    }

    pub fn sent(&self) -> Vec<SentMail> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ActionError> {
        lock(&self.mode).check(Collaborator::Mail)?;
        lock(&self.sent).push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// All five mocks, kept as concrete handles so tests can inspect them.
#[derive(Clone)]
pub struct MockCollaborators {
    pub model: Arc<MockLanguageModel>,
    pub weather: Arc<MockWeatherService>,
    pub launcher: Arc<MockAppLauncher>,
    pub opener: Arc<MockUrlOpener>,
    pub mail: Arc<MockMailTransport>,
}

impl MockCollaborators {
    /// Model answers "42"; weather knows Tokyo.
    pub fn new() -> Self {
        Self {
            model: Arc::new(MockLanguageModel::answering("42")),
            weather: Arc::new(MockWeatherService::with_report(WeatherReport {
                location: "Tokyo".to_string(),
                country: "Japan".to_string(),
                temp_c: 18.0,
                temp_f: 64.4,
                condition: "Partly cloudy".to_string(),
            })),
            launcher: Arc::new(MockAppLauncher::default()),
            opener: Arc::new(MockUrlOpener::default()),
            mail: Arc::new(MockMailTransport::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            model: self.model.clone(),
            weather: self.weather.clone(),
            launcher: self.launcher.clone(),
            opener: self.opener.clone(),
            mail: self.mail.clone(),
        }
    }
}

impl Default for MockCollaborators {
    fn default() -> Self {
        Self::new()
    }
}
