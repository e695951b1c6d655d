//! Nency API crate - axum HTTP server and route handlers.
//!
//! Serves the assistant page and the JSON endpoints the page uses:
//! command processing, direct email sending, session listing, history and
//! draft cancellation, plus a health check.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
