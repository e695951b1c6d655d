//! Shared foundations for the Nency assistant: configuration and the
//! top-level error type.

pub mod config;
pub mod error;

pub use config::NencyConfig;
pub use error::{NencyError, Result};
