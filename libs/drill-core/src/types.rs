//! Core types for the word drill.

use crate::error::{DrillError, Result};
use crate::script::Script;
use serde::{Deserialize, Serialize};

/// Word difficulty tier. Filtering by tier happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// A prompt shown to the learner.
///
/// When `category` is set the word is a concept prompt: any known-language
/// rendering of the same concept is an acceptable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Word {
    /// Fixed-spelling word with no language hint.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            language: None,
            difficulty: Difficulty::default(),
            category: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Whether this word is matched by concept rather than by spelling.
    pub fn is_concept_prompt(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// Session-level language selection, either a bare tag or a richer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageRef {
    Tag(String),
    Language {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl LanguageRef {
    pub fn code(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Language { code, .. } => code,
        }
    }

    /// Ruleset for this selection, or `None` if it names no concrete language.
    pub fn script(&self) -> Option<Script> {
        Script::from_tag(self.code())
    }
}

impl From<&str> for LanguageRef {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for LanguageRef {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

/// Which comparison accepted a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedVia {
    Direct,
    Concept,
    ScriptFallback,
}

/// Verdict for one submission. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub accepted: bool,
    /// `None` on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_via: Option<MatchedVia>,
    pub normalized_input: String,
    pub normalized_expected: String,
    /// Ruleset the word resolved to.
    pub script: Script,
    /// Similarity between 0.0 and 1.0 of the primary normalized forms.
    pub similarity: f64,
    /// Dictionary language that matched on a concept pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_language: Option<String>,
}

impl ValidationResult {
    /// Fail-closed verdict for blank input or a blank word.
    pub fn rejected_blank(script: Script) -> Self {
        Self {
            accepted: false,
            matched_via: None,
            normalized_input: String::new(),
            normalized_expected: String::new(),
            script,
            similarity: 0.0,
            matched_language: None,
        }
    }
}

/// Session configuration with documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub points_per_correct: u32,
    pub initial_lives: u32,
    pub max_hints: u32,
    /// Seconds allowed per word; `None` disables the countdown.
    pub time_limit_secs: Option<u32>,
    /// How long a verdict stays on screen before the next word.
    pub result_display_ms: u64,
    /// Countdown granularity.
    pub tick_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageRef>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            points_per_correct: 10,
            initial_lives: 3,
            max_hints: 3,
            time_limit_secs: Some(30),
            result_display_ms: 1500,
            tick_ms: 1000,
            language: None,
        }
    }
}

impl SessionConfig {
    /// Merge base configuration with optional overrides.
    pub fn merge(base: &SessionConfig, overrides: Option<&SessionOverrides>) -> Self {
        match overrides {
            Some(o) => Self {
                points_per_correct: o.points_per_correct.unwrap_or(base.points_per_correct),
                initial_lives: o.initial_lives.unwrap_or(base.initial_lives),
                max_hints: o.max_hints.unwrap_or(base.max_hints),
                time_limit_secs: match o.time_limit_secs {
                    Some(0) => None,
                    Some(secs) => Some(secs),
                    None => base.time_limit_secs,
                },
                result_display_ms: o.result_display_ms.unwrap_or(base.result_display_ms),
                tick_ms: base.tick_ms,
                language: o.language.clone().or_else(|| base.language.clone()),
            },
            None => base.clone(),
        }
    }

    /// Reject configurations under which a session cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.initial_lives == 0 {
            return Err(DrillError::InvalidConfig {
                field: "initial_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tick_ms == 0 {
            return Err(DrillError::InvalidConfig {
                field: "tick_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.time_limit_secs == Some(0) {
            return Err(DrillError::InvalidConfig {
                field: "time_limit_secs",
                reason: "use no limit instead of zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Per-session overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_per_correct: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_lives: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hints: Option<u32>,
    /// Zero turns the countdown off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_display_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageRef>,
}
