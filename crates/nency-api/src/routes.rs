//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! rate limiting, and all endpoint handlers.

use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use nency_core::error::NencyError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Origins the page can be served from: the configured host plus both
/// loopback spellings, on the configured port.
fn allowed_origins(host: &str, port: u16) -> Vec<HeaderValue> {
    let mut hosts = vec!["127.0.0.1", "localhost"];
    if !hosts.contains(&host) && host != "0.0.0.0" {
        hosts.push(host);
    }
    hosts
        .into_iter()
        .filter_map(|h| format!("http://{}:{}", h, port).parse::<HeaderValue>().ok())
        .collect()
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let general = &state.config.general;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(&general.host, general.port)))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health));

    let limiter = RateLimiter::new(state.config.chat.rate_limit_per_sec);

    let rate_limited_routes = Router::new()
        .route("/process_command", post(handlers::process_command))
        .route("/send_email", post(handlers::send_email))
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/{id}", delete(handlers::delete_session))
        .route("/sessions/{id}/history", get(handlers::session_history))
        .route("/sessions/{id}/cancel", post(handlers::cancel_session))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(limiter));

    public_routes
        .merge(rate_limited_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB global limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<(), NencyError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.general.host, state.config.general.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NencyError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| NencyError::Api(format!("Server error: {}", e)))?;

    tracing::info!("API server stopped");
    Ok(())
}
