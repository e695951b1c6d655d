//! URL opening and web search URLs.
//!
//! Opens URLs in the default browser with scheme validation.

use reqwest::Url;

use crate::error::ActionError;
use crate::handler::UrlOpener;
use crate::types::Collaborator;

/// Check that a URL is non-empty and uses `http://` or `https://`.
///
/// Rejects `javascript:`, `file://`, `data:`, and all other schemes.
pub fn validate_url(url: &str) -> Result<(), ActionError> {
    if url.is_empty() {
        return Err(ActionError::InvalidPayload(
            "URL must not be empty".to_string(),
        ));
    }

    let lower = url.to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return Err(ActionError::InvalidPayload(format!(
            "Unsupported URL scheme. Only http:// and https:// are allowed, got: {}",
            url
        )));
    }

    Ok(())
}

/// Build the search page URL for `query`, form-encoding it as `q`.
pub fn search_url(engine_url: &str, query: &str) -> Result<String, ActionError> {
    if query.trim().is_empty() {
        return Err(ActionError::InvalidPayload(
            "search query must not be empty".to_string(),
        ));
    }
    let url = Url::parse_with_params(engine_url, &[("q", query)])
        .map_err(|e| ActionError::InvalidPayload(format!("invalid search engine URL: {}", e)))?;
    Ok(url.into())
}

/// Opens URLs with the platform's default handler.
pub struct BrowserUrlOpener;

impl UrlOpener for BrowserUrlOpener {
    fn open(&self, url: &str) -> Result<(), ActionError> {
        validate_url(url)?;
        open::that_detached(url).map_err(|e| ActionError::external(Collaborator::UrlOpener, e))?;
        tracing::info!(url = %url, "Opened URL");
        Ok(())
    }
}
