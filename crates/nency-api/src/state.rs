//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use nency_action::{ActionDispatcher, Collaborators};
use nency_chat::AssistantOrchestrator;
use nency_core::config::NencyConfig;

/// Shared application state.
///
/// Cloned into every handler task; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after startup).
    pub config: Arc<NencyConfig>,
    /// Dialog guard, classifier and dispatcher behind one entry point.
    pub orchestrator: Arc<AssistantOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Wire the orchestrator to the given collaborators.
    pub fn new(config: NencyConfig, collaborators: Collaborators) -> Self {
        let dispatcher = ActionDispatcher::new(collaborators, config.search.engine_url.clone());
        let orchestrator = AssistantOrchestrator::new(dispatcher, &config.chat);
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
