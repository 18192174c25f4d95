use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::SessionView,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Starts a new idle session
pub async fn create(State(state): State<Arc<AppState>>) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    tracing::debug!(session_id = %session_id, "Session started");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// Returns the current state of a session
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(SessionView::new(session_id, &session)))
}

/// Discards a session
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.sessions.remove(session_id).await {
        return Err(session_not_found(session_id));
    }
    tracing::debug!(session_id = %session_id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("session {}", session_id))
}
