//! CLI argument definitions for the Nency assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Environment variable naming the config file.
pub const ENV_CONFIG: &str = "NENCY_CONFIG";
/// Environment variable overriding the server port.
pub const ENV_PORT: &str = "NENCY_PORT";

/// Nency, a voice-driven personal assistant served to the browser.
#[derive(Parser, Debug)]
#[command(name = "nency", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Interface to bind (e.g. 127.0.0.1 or 0.0.0.0).
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NENCY_CONFIG env var > ~/.nency/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(|key| std::env::var(key).ok())
    }

    fn resolve_config_path_with<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup(ENV_CONFIG).filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path(&lookup)
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > NENCY_PORT env var > config file value > 5000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.resolve_port_with(config_port, |key| std::env::var(key).ok())
    }

    fn resolve_port_with<F>(&self, config_port: u16, lookup: F) -> u16
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(p) = lookup(ENV_PORT).and_then(|v| v.parse::<u16>().ok()) {
            return p;
        }
        if config_port != 0 {
            return config_port;
        }
        5000
    }

    /// Log filter directive when RUST_LOG is unset.
    ///
    /// Priority: --log-level flag > config file value > "info".
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        match (&self.log_level, config_level.trim()) {
            (Some(level), _) => level.clone(),
            (None, "") => "info".to_string(),
            (None, level) => level.to_string(),
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let home_var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    match lookup(home_var) {
        Some(home) => PathBuf::from(home).join(".nency").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
