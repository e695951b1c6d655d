//! Reply composition.
//!
//! Pairs display text with a speech-friendly variant so the page never
//! reads a URL out loud character by character.

use std::sync::LazyLock;

use regex::Regex;

use crate::dialog::DialogState;
use crate::types::AssistantReply;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("Invalid URL regex"));

const SPOKEN_URL: &str = "link";

/// Builds [`AssistantReply`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseGenerator;

impl ResponseGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, text: impl Into<String>, dialog_state: DialogState) -> AssistantReply {
        let text = text.into();
        let speech = self.speech_text(&text);
        AssistantReply {
            text,
            speech,
            dialog_state,
        }
    }

    /// Replace every `http://` or `https://` URL with "link".
    pub fn speech_text(&self, text: &str) -> String {
        URL_PATTERN.replace_all(text, SPOKEN_URL).into_owned()
    }
}
