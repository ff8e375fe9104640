//! Answer validation for typed submissions.

use crate::concept::{find_match, ConceptDictionary};
use crate::normalize::{normalize, normalize_lenient};
use crate::resolver::resolve;
use crate::types::{LanguageRef, MatchedVia, ValidationResult, Word};
use std::sync::Arc;

/// Stateless validator. Cheap to clone and safe to share between sessions.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    dictionary: Arc<ConceptDictionary>,
}

impl Validator {
    pub fn new(dictionary: Arc<ConceptDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &ConceptDictionary {
        &self.dictionary
    }

    /// Decide whether `input` answers `word`.
    ///
    /// Blank input or a blank word is rejected before any other work.
    pub fn validate(
        &self,
        input: &str,
        word: &Word,
        session_language: Option<&LanguageRef>,
    ) -> ValidationResult {
        let script = resolve(word, session_language);
        if input.trim().is_empty() || word.text.trim().is_empty() {
            return ValidationResult::rejected_blank(script);
        }

        let normalized_input = normalize(input, script);
        let normalized_expected = normalize(&word.text, script);
        let similarity = normalized_similarity(&normalized_input, &normalized_expected);

        if word.is_concept_prompt() {
            if let Some(found) = find_match(input, word, script, &self.dictionary) {
                return ValidationResult {
                    accepted: true,
                    matched_via: Some(MatchedVia::Concept),
                    normalized_input,
                    normalized_expected,
                    script,
                    similarity,
                    matched_language: found.language,
                };
            }
        }

        if !normalized_input.is_empty() && normalized_input == normalized_expected {
            return ValidationResult {
                accepted: true,
                matched_via: Some(MatchedVia::Direct),
                normalized_input,
                normalized_expected,
                script,
                similarity,
                matched_language: None,
            };
        }

        if script.is_high_variance() {
            let lenient_input = normalize_lenient(input, script);
            let lenient_expected = normalize_lenient(&word.text, script);
            if !lenient_input.is_empty() && lenient_input == lenient_expected {
                return ValidationResult {
                    accepted: true,
                    matched_via: Some(MatchedVia::ScriptFallback),
                    normalized_input: lenient_input,
                    normalized_expected: lenient_expected,
                    script,
                    similarity,
                    matched_language: None,
                };
            }
        }

        ValidationResult {
            accepted: false,
            matched_via: None,
            normalized_input,
            normalized_expected,
            script,
            similarity,
            matched_language: None,
        }
    }
}

/// Validate against an empty dictionary.
pub fn validate(
    input: &str,
    word: &Word,
    session_language: Option<&LanguageRef>,
) -> ValidationResult {
    Validator::default().validate(input, word, session_language)
}

/// Calculate Levenshtein distance between two strings, in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized similarity (0.0 to 1.0) based on Levenshtein distance.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
