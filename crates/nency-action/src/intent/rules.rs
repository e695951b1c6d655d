//! Ordered keyword rules for intent classification.
//!
//! Rules are evaluated top to bottom and the first match wins. The order is
//! part of the behavior: "open example.com" must be tried as a site before
//! it is tried as an application, and a weather question beats an email
//! command that happens to contain "weather".

use crate::types::Intent;

const SEARCH_PHRASE: &str = "search for";
const OPEN_PREFIX: &str = "open ";
const LAUNCH_PREFIX: &str = "launch ";
const SITE_SUFFIXES: [&str; 3] = [".com", ".org", ".net"];
const WEATHER_KEYWORD: &str = "weather";
const CITY_MARKER: &str = "in";
const EMAIL_PREFIX: &str = "send an email to";

/// A trimmed utterance together with its ASCII-lowercased form.
///
/// Matching runs on `lower`; extraction slices `original` at the same byte
/// offsets, so parameters keep the user's casing. ASCII lowercasing never
/// changes byte lengths, which keeps the two strings aligned.
#[derive(Debug, Clone)]
pub struct Utterance<'a> {
    pub original: &'a str,
    pub lower: String,
}

impl<'a> Utterance<'a> {
    pub fn new(raw: &'a str) -> Self {
        let original = raw.trim();
        Self {
            original,
            lower: original.to_ascii_lowercase(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.original.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.lower.starts_with(prefix)
    }

    /// Original text after the first occurrence of `needle`, trimmed.
    pub fn after_first(&self, needle: &str) -> Option<&'a str> {
        self.lower
            .find(needle)
            .map(|idx| self.original[idx + needle.len()..].trim())
    }

    /// Original text after `prefix`, trimmed, if the utterance starts with it.
    pub fn after_prefix(&self, prefix: &str) -> Option<&'a str> {
        self.starts_with(prefix)
            .then(|| self.original[prefix.len()..].trim())
    }
}

/// One `(predicate, extractor)` pair.
///
/// `extract` is only called after `matches` returned true for the same
/// utterance.
pub struct IntentRule {
    pub name: &'static str,
    pub matches: fn(&Utterance<'_>) -> bool,
    pub extract: fn(&Utterance<'_>) -> Intent,
}

/// The rule list, in evaluation order.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        name: "search",
        matches: |u| u.contains(SEARCH_PHRASE),
        extract: |u| Intent::Search {
            query: u.after_first(SEARCH_PHRASE).unwrap_or_default().to_string(),
        },
    },
    IntentRule {
        name: "open_site",
        matches: |u| u.starts_with(OPEN_PREFIX) && SITE_SUFFIXES.iter().any(|s| u.contains(s)),
        extract: |u| Intent::OpenSite {
            url: with_scheme(u.after_prefix(OPEN_PREFIX).unwrap_or_default()),
        },
    },
    IntentRule {
        name: "open_app",
        matches: |u| u.starts_with(OPEN_PREFIX) || u.starts_with(LAUNCH_PREFIX),
        extract: |u| Intent::OpenApp {
            name: u
                .after_prefix(OPEN_PREFIX)
                .or_else(|| u.after_prefix(LAUNCH_PREFIX))
                .unwrap_or_default()
                .to_string(),
        },
    },
    IntentRule {
        name: "weather",
        // Naive on purpose: "in" is matched anywhere, even inside words.
        matches: |u| u.contains(WEATHER_KEYWORD) && u.contains(CITY_MARKER),
        extract: |u| Intent::Weather {
            city: u.after_first(CITY_MARKER).unwrap_or_default().to_string(),
        },
    },
    IntentRule {
        name: "compose_email",
        matches: |u| u.starts_with(EMAIL_PREFIX),
        extract: |u| Intent::ComposeEmail {
            recipient: u.after_prefix(EMAIL_PREFIX).unwrap_or_default().to_string(),
        },
    },
];

/// Classify an utterance. Never fails.
pub fn classify(utterance: &str) -> Intent {
    let u = Utterance::new(utterance);
    if u.is_blank() {
        return Intent::Unrecognized;
    }

    for rule in RULES {
        if (rule.matches)(&u) {
            let intent = (rule.extract)(&u);
            tracing::debug!(rule = rule.name, kind = %intent.kind(), "Utterance classified");
            return intent;
        }
    }

    tracing::debug!("No rule matched; forwarding to the language model");
    Intent::AskModel {
        question: u.original.to_string(),
    }
}

fn with_scheme(site: &str) -> String {
    if site.contains("://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}
