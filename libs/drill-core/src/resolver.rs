//! Decides which ruleset governs a word.

use crate::script::Script;
use crate::types::{LanguageRef, Word};

/// Resolve the ruleset for `word`.
///
/// Precedence: the word's own language, then the session language, then the
/// character-range heuristic over the word's text, then Latin. Never fails.
pub fn resolve(word: &Word, session_language: Option<&LanguageRef>) -> Script {
    word.language
        .as_deref()
        .and_then(Script::from_tag)
        .or_else(|| session_language.and_then(LanguageRef::script))
        .or_else(|| Script::detect(&word.text))
        .unwrap_or_default()
}

/// Ruleset for a bare language tag, as recorded in the concept dictionary.
/// Non-concrete tags fall back to the heuristic over `sample`.
pub fn resolve_tag(tag: &str, sample: &str) -> Script {
    Script::from_tag(tag)
        .or_else(|| Script::detect(sample))
        .unwrap_or_default()
}
