//! Drill session endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use drill_core::{LiveSession, SessionConfig};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{CreateSessionRequest, SessionResponse, SubmitRequest};
use crate::AppState;

async fn find(state: &AppState, id: Uuid) -> Result<Arc<LiveSession>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", id)))
}

async fn respond(id: Uuid, session: &LiveSession) -> Json<SessionResponse> {
    let state = session.state().await;
    let hint = session.current_hint().await;
    Json(SessionResponse { id, state, hint })
}

/// POST /api/sessions
/// Starts a session over the given words
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    if let Some(index) = payload
        .words
        .iter()
        .position(|w| w.id.trim().is_empty() || w.text.trim().is_empty())
    {
        return Err(ApiError::BadRequest(format!(
            "words[{}] needs a non-blank id and text",
            index
        )));
    }

    let mut config = SessionConfig::merge(&state.config.session, payload.overrides.as_ref());
    if payload.language.is_some() {
        config.language = payload.language;
    }
    if let Err(err) = config.validate() {
        tracing::warn!("Rejected session config: {}", err);
        return Err(err.into());
    }

    let (id, session) = state
        .sessions
        .create(payload.words, config, (*state.validator).clone())
        .await;

    Ok((StatusCode::CREATED, respond(id, &session).await))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    Ok(respond(id, &session).await)
}

/// DELETE /api/sessions/:id
/// Stops the session's timers and discards it
pub async fn close(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {}", id)))
    }
}

/// POST /api/sessions/:id/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    session.submit(&payload.input).await;
    Ok(respond(id, &session).await)
}

/// POST /api/sessions/:id/skip
pub async fn skip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    session.skip().await;
    Ok(respond(id, &session).await)
}

/// POST /api/sessions/:id/hint
pub async fn hint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    session.request_hint().await;
    Ok(respond(id, &session).await)
}

/// POST /api/sessions/:id/restart
pub async fn restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    session.restart().await;
    Ok(respond(id, &session).await)
}
