use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NencyError, Result};

/// Environment variable holding the generative-language API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the weatherapi.com key.
pub const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";
/// Environment variable holding the sender mailbox address.
pub const ENV_EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
/// Environment variable holding the sender mailbox (app) password.
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";

/// Top-level configuration for the Nency assistant.
///
/// Loaded from `~/.nency/config.toml` by default. Secrets are normally left
/// out of the file and supplied through the environment instead, see
/// [`NencyConfig::apply_env_overrides`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NencyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl NencyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NencyConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NencyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Overlay secrets from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay secrets from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_GEMINI_API_KEY) {
            self.model.api_key = key;
        }
        if let Some(key) = get(ENV_WEATHER_API_KEY) {
            self.weather.api_key = key;
        }
        if let Some(address) = get(ENV_EMAIL_ADDRESS) {
            self.mail.address = address;
        }
        if let Some(password) = get(ENV_EMAIL_PASSWORD) {
            self.mail.password = password;
        }
    }

    /// Names of the environment variables whose features are unusable
    /// because the matching credential is missing.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.model.api_key.is_empty() {
            missing.push(ENV_GEMINI_API_KEY);
        }
        if self.weather.api_key.is_empty() {
            missing.push(ENV_WEATHER_API_KEY);
        }
        if self.mail.address.is_empty() {
            missing.push(ENV_EMAIL_ADDRESS);
        }
        if self.mail.password.is_empty() {
            missing.push(ENV_EMAIL_PASSWORD);
        }
        missing
    }
}

/// HTTP server and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Interface the server binds to.
    pub host: String,
    /// Port the server binds to.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

/// Conversation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Longest accepted utterance, in characters.
    pub max_message_length: usize,
    /// Idle minutes after which a session (and its draft) is dropped.
    pub session_timeout_minutes: u32,
    /// Messages kept per session history.
    pub history_limit: usize,
    /// Command requests accepted per second across all clients.
    pub rate_limit_per_sec: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            session_timeout_minutes: 30,
            history_limit: 100,
            rate_limit_per_sec: 20,
        }
    }
}

/// Generative-language backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Weather backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "http://api.weatherapi.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender mailbox, also used as the SMTP username.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            address: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search page the query is appended to as `?q=`.
    pub engine_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine_url: "https://www.google.com/search".to_string(),
        }
    }
}
