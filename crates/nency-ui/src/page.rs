//! The assistant page served at `/`.

/// Chat history, text input, microphone button (Web Speech recognition when
/// the browser has it), spoken replies, clickable links, and a Cancel
/// button shown while an email draft is open.
///
/// The page talks to `/process_command` and `/sessions/{id}/cancel` and
/// keeps the returned `session_id` in `sessionStorage`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_html_is_valid_html() {
        assert!(INDEX_HTML.starts_with("<!DOCTYPE html>"));
        assert!(INDEX_HTML.contains("<html"));
        assert!(INDEX_HTML.contains("</html>"));
    }

    #[test]
    fn index_html_is_self_contained() {
        assert!(INDEX_HTML.contains("<style>"));
        assert!(INDEX_HTML.contains("<script>"));
        assert!(!INDEX_HTML.contains("cdn."));
        assert!(!INDEX_HTML.contains("<link rel=\"stylesheet\""));
    }

    #[test]
    fn index_html_calls_api_routes() {
        assert!(INDEX_HTML.contains("'/process_command'"));
        assert!(INDEX_HTML.contains("/cancel"));
        assert!(INDEX_HTML.contains("session_id"));
    }

    #[test]
    fn index_html_has_controls() {
        assert!(INDEX_HTML.contains("id=\"chat-history\""));
        assert!(INDEX_HTML.contains("id=\"text-input\""));
        assert!(INDEX_HTML.contains("id=\"mic-btn\""));
        assert!(INDEX_HTML.contains("id=\"cancel-btn\""));
        assert!(INDEX_HTML.contains("id=\"loading\""));
    }

    #[test]
    fn index_html_speaks_and_escapes() {
        assert!(INDEX_HTML.contains("SpeechSynthesisUtterance"));
        assert!(INDEX_HTML.contains("escapeHtml"));
    }
}
