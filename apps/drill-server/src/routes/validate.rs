//! Stateless answer validation endpoint

use axum::{extract::State, Json};

use crate::models::{ValidateRequest, ValidationResult};
use crate::AppState;

/// POST /api/validate
/// Checks a single answer without starting a session
pub async fn validate(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRequest>,
) -> Json<ValidationResult> {
    let result = state.validator.validate(
        &payload.input,
        &payload.word,
        payload.session_language.as_ref(),
    );

    tracing::debug!(
        "Validated answer for {}: accepted={} via={:?}",
        payload.word.id,
        result.accepted,
        result.matched_via
    );

    Json(result)
}
