//! Collaborator contracts and their implementations.
//!
//! Each external service the assistant depends on is a trait here. The real
//! implementations live in the submodules; `mock` holds recording doubles
//! for tests in this and downstream crates.

pub mod app_launch;
pub mod gemini;
pub mod mail;
pub mod mock;
pub mod url_open;
pub mod weather;

use std::sync::Arc;

use async_trait::async_trait;
use nency_core::NencyConfig;

use crate::error::ActionError;
use crate::types::WeatherReport;

/// Forwards free-form questions to a generative language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, ActionError>;
}

/// Looks up current weather conditions for a city.
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReport, ActionError>;
}

/// Starts a desktop application by user-facing name.
pub trait AppLauncher: Send + Sync {
    fn launch(&self, name: &str) -> Result<(), ActionError>;
}

/// Opens a URL in the user's browser without waiting for it.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), ActionError>;
}

/// Delivers a plain-text email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ActionError>;
}

/// The full set of collaborators the dispatcher needs.
#[derive(Clone)]
pub struct Collaborators {
    pub model: Arc<dyn LanguageModel>,
    pub weather: Arc<dyn WeatherService>,
    pub launcher: Arc<dyn AppLauncher>,
    pub opener: Arc<dyn UrlOpener>,
    pub mail: Arc<dyn MailTransport>,
}

impl Collaborators {
    /// Build the real collaborators from configuration.
    ///
    /// Missing credentials do not fail here; the affected collaborator
    /// reports [`ActionError::Unavailable`] when it is called.
    pub fn from_config(config: &NencyConfig) -> Result<Self, ActionError> {
        Ok(Self {
            model: Arc::new(gemini::GeminiClient::new(&config.model)?),
            weather: Arc::new(weather::WeatherApiClient::new(&config.weather)?),
            launcher: Arc::new(app_launch::SystemAppLauncher::new()),
            opener: Arc::new(url_open::BrowserUrlOpener),
            mail: Arc::new(mail::SmtpMailTransport::new(&config.mail)?),
        })
    }
}
