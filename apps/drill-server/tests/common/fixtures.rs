//! Test fixtures and factory functions for request bodies.

use serde_json::{json, Value};

pub const SAMPLE_DICTIONARY: &str = include_str!("../../data/concepts.json");

/// A fixed-spelling word.
pub fn word(id: &str, text: &str, language: &str) -> Value {
    json!({ "id": id, "text": text, "language": language })
}

/// A picture prompt answerable in any language the dictionary knows.
pub fn concept_word(id: &str, text: &str, language: &str, category: &str) -> Value {
    json!({ "id": id, "text": text, "language": language, "category": category })
}

/// Three English words.
pub fn english_words() -> Vec<Value> {
    vec![
        word("w1", "bird", "en"),
        word("w2", "tree", "en"),
        word("w3", "river", "en"),
    ]
}

pub fn create_session_request(words: Vec<Value>) -> Value {
    json!({ "words": words })
}

pub fn create_session_with_overrides(words: Vec<Value>, overrides: Value) -> Value {
    json!({ "words": words, "overrides": overrides })
}

pub fn submit_request(input: &str) -> Value {
    json!({ "input": input })
}

pub fn validate_request(input: &str, word: Value) -> Value {
    json!({ "input": input, "word": word })
}
