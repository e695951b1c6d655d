//! Shared types for the action engine.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Intent
// =============================================================================

/// The action a single utterance maps to.
///
/// Exactly one variant is produced per utterance. `Unrecognized` is only
/// produced for blank input; anything else that matches no rule becomes
/// `AskModel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Search { query: String },
    OpenSite { url: String },
    OpenApp { name: String },
    Weather { city: String },
    ComposeEmail { recipient: String },
    AskModel { question: String },
    Unrecognized,
}

impl Intent {
    /// The parameter-free kind of this intent.
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Search { .. } => IntentKind::Search,
            Intent::OpenSite { .. } => IntentKind::OpenSite,
            Intent::OpenApp { .. } => IntentKind::OpenApp,
            Intent::Weather { .. } => IntentKind::Weather,
            Intent::ComposeEmail { .. } => IntentKind::ComposeEmail,
            Intent::AskModel { .. } => IntentKind::AskModel,
            Intent::Unrecognized => IntentKind::Unrecognized,
        }
    }
}

/// Intent discriminant, used for logging and API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Search,
    OpenSite,
    OpenApp,
    Weather,
    ComposeEmail,
    AskModel,
    Unrecognized,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Search => write!(f, "search"),
            IntentKind::OpenSite => write!(f, "open_site"),
            IntentKind::OpenApp => write!(f, "open_app"),
            IntentKind::Weather => write!(f, "weather"),
            IntentKind::ComposeEmail => write!(f, "compose_email"),
            IntentKind::AskModel => write!(f, "ask_model"),
            IntentKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// External services and OS facilities the assistant delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    LanguageModel,
    Weather,
    AppLauncher,
    UrlOpener,
    Mail,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::LanguageModel => write!(f, "language model"),
            Collaborator::Weather => write!(f, "weather service"),
            Collaborator::AppLauncher => write!(f, "app launcher"),
            Collaborator::UrlOpener => write!(f, "URL opener"),
            Collaborator::Mail => write!(f, "mail transport"),
        }
    }
}

/// Current conditions for one location, as returned by a weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub country: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: String,
}

impl WeatherReport {
    /// Render the report as the fixed reply sentence.
    pub fn describe(&self) -> String {
        format!(
            "Current weather in {}, {}: {} with a temperature of {:.1}°C ({:.1}°F).",
            self.location, self.country, self.condition, self.temp_c, self.temp_f
        )
    }
}
