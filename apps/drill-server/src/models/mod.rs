//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from drill-core
pub use drill_core::{
    LanguageRef, MatchedVia, SessionOverrides, SessionState, ValidationResult, Word,
};

/// Body of `POST /api/validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub input: String,
    pub word: Word,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_language: Option<LanguageRef>,
}

/// Body of `POST /api/sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub words: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<SessionOverrides>,
}

/// Body of `POST /api/sessions/:id/submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub input: String,
}

/// Session snapshot returned by every session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub state: SessionState,
    /// Revealed prefix of the current word, once a hint has been used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
