//! Nency application binary - composition root.
//!
//! 1. Load `.env`, then configuration from TOML plus environment secrets
//! 2. Build the real collaborators (language model, weather, browser, apps, SMTP)
//! 3. Start the session sweeper
//! 4. Serve the page and API until Ctrl-C

mod cli;

use std::path::Path;
use std::time::Duration;

use clap::Parser;

use nency_action::Collaborators;
use nency_api::{start_server, AppState};
use nency_core::config::NencyConfig;
use nency_core::error::NencyError;

use crate::cli::CliArgs;

/// How often expired sessions are dropped.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Drop expired sessions (and their drafts) on a fixed interval.
async fn session_sweeper(state: AppState) {
    let mut interval = tokio::time::interval(PURGE_INTERVAL);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        match state.orchestrator.purge_expired() {
            Ok(0) => {}
            Ok(n) => tracing::debug!(purged = n, "Expired sessions removed"),
            Err(e) => tracing::warn!(error = %e, "Session purge failed"),
        }
    }
}

/// Read the config file, falling back to defaults.
///
/// The load error is handed back so it can be logged once tracing is up.
fn load_config(path: &Path) -> (NencyConfig, Option<NencyError>) {
    match NencyConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (NencyConfig::default(), Some(e)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // A missing .env is normal.
    let dotenv = dotenvy::dotenv();

    let config_file = args.resolve_config_path();
    let (mut config, load_error) = load_config(&config_file);
    config.apply_env_overrides();

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Nency v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(NencyError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %config_file.display(), "No config file; using defaults")
        }
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config; using defaults"
        ),
    }
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Environment loaded from .env");
    }

    if let Some(host) = args.host.clone() {
        config.general.host = host;
    }
    config.general.port = args.resolve_port(config.general.port);

    for var in config.missing_credentials() {
        tracing::warn!(
            variable = var,
            "Credential not set; the matching feature will report itself unavailable"
        );
    }

    let collaborators = match Collaborators::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build collaborators");
            return Err(e.into());
        }
    };

    let host = config.general.host.clone();
    let port = config.general.port;
    let state = AppState::new(config, collaborators);

    tokio::spawn(session_sweeper(state.clone()));

    tracing::info!("Assistant page at http://{}:{}/", host, port);

    if let Err(e) = start_server(state, shutdown_signal()).await {
        tracing::error!(error = %e, "Server failed");
        tracing::error!("Try: NENCY_PORT={} nency", port.saturating_add(1));
        return Err(e.into());
    }

    Ok(())
}
