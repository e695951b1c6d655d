//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its parameters via axum extractors, calls the
//! orchestrator, and returns JSON.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nency_chat::{ChatMessage, DialogState, SessionSummary};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// Request body for POST /process_command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    /// Omit to start a new session.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub response: String,
    pub speech: String,
    pub session_id: Uuid,
    pub dialog_state: DialogState,
}

/// Request body for POST /send_email.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub recipient: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub response: String,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub response: String,
    pub speech: String,
    pub dialog_state: DialogState,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - serve the assistant page.
pub async fn index() -> impl IntoResponse {
    Html(nency_ui::INDEX_HTML)
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.orchestrator.active_sessions(),
    })
}

/// POST /process_command - handle one utterance.
///
/// Collaborator failures are part of `response`, so this only fails for
/// oversized input or internal errors.
pub async fn process_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let (reply, session_id) = state
        .orchestrator
        .handle_command(&req.command, req.session_id)
        .await?;

    Ok(Json(CommandResponse {
        response: reply.text,
        speech: reply.speech,
        session_id,
        dialog_state: reply.dialog_state,
    }))
}

/// POST /send_email - send an email directly, bypassing the dialog.
pub async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> Json<SendEmailResponse> {
    let outcome = state
        .orchestrator
        .send_email(&req.recipient, &req.subject, &req.message)
        .await;

    Json(SendEmailResponse {
        response: outcome.message,
        success: outcome.success,
    })
}

/// GET /sessions - list live sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.orchestrator.list_sessions(),
    })
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state.orchestrator.history(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        messages,
    }))
}

/// POST /sessions/{id}/cancel - discard the session's email draft.
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    let reply = state.orchestrator.cancel(id)?;
    Ok(Json(CancelResponse {
        response: reply.text,
        speech: reply.speech,
        dialog_state: reply.dialog_state,
    }))
}
