//! Action engine for Nency.
//!
//! Classifies utterances into intents, defines the collaborator contracts
//! (language model, weather, app launcher, URL opener, mail transport) and
//! dispatches intents to them, turning every outcome into reply text.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod intent;
pub mod types;

pub use dispatcher::{ActionDispatcher, ActionOutcome};
pub use error::ActionError;
pub use handler::{
    AppLauncher, Collaborators, LanguageModel, MailTransport, UrlOpener, WeatherService,
};
pub use intent::classify;
pub use types::{Collaborator, Intent, IntentKind, WeatherReport};
