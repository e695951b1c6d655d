//! Nency UI crate - the embedded assistant page.
//!
//! The page is a single self-contained HTML file (CSS and JavaScript
//! inline), embedded at compile time via `include_str!` so the binary has
//! no runtime file dependencies.
//!
//! ```rust,ignore
//! use nency_ui::INDEX_HTML;
//!
//! async fn index() -> axum::response::Html<&'static str> {
//!     axum::response::Html(INDEX_HTML)
//! }
//! ```

pub mod page;

pub use page::INDEX_HTML;
