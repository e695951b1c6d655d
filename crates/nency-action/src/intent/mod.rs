//! Intent classification from free-text utterances.
//!
//! Classification is a pure, total function: every utterance maps to
//! exactly one [`Intent`](crate::types::Intent), falling back to asking the
//! language model when no rule matches.

pub mod rules;

pub use rules::{classify, IntentRule, Utterance, RULES};
