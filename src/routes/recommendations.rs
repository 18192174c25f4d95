use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Feedback, SessionState, SessionView},
    services::recommendations,
};

use super::{sessions::session_not_found, AppState};

pub const FEEDBACK_THANKS: &str = "Thank you for your feedback!";

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// A value from the song picker, `"{song} - {artist}"`
    pub song: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: String,
}

/// Handler for the "show recommendation" action
///
/// Only values from the catalog enumeration are accepted; anything else is
/// rejected before lookup. On success the session state is replaced wholesale.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<SessionView>> {
    if !state.sessions.touch(session_id).await {
        return Err(session_not_found(session_id));
    }

    let selected = state
        .catalog
        .resolve_display(&request.song)
        .cloned()
        .ok_or_else(|| {
            AppError::InvalidInput(format!("'{}' is not a catalog song", request.song))
        })?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        song = %selected,
        "Processing recommendation request"
    );

    let outcome =
        recommendations::get_recommendations(&state.catalog, state.music_search.clone(), &selected)
            .await?;

    let session = SessionState::showing_results(
        outcome.selected.display_name(),
        outcome.now_playing_embed_url,
        outcome.songs,
    );

    if !state.sessions.replace(session_id, session.clone()).await {
        return Err(session_not_found(session_id));
    }

    Ok(Json(SessionView::new(session_id, &session)))
}

/// Handler for recommendation feedback
///
/// Feedback is written to the log and acknowledged; it is not stored.
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(feedback): Json<Feedback>,
) -> AppResult<Json<FeedbackResponse>> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    if !feedback.has_valid_rating() {
        return Err(AppError::InvalidInput(format!(
            "rating must be between {} and {}",
            Feedback::MIN_RATING,
            Feedback::MAX_RATING
        )));
    }

    if !session.has_results() {
        return Err(AppError::InvalidInput(
            "no recommendations to give feedback on".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        song = session.selected_song.as_deref().unwrap_or_default(),
        rating = feedback.rating,
        feedback = %feedback.text,
        submitted_at = %chrono::Utc::now().to_rfc3339(),
        "Feedback received"
    );

    Ok(Json(FeedbackResponse {
        message: FEEDBACK_THANKS.to_string(),
    }))
}
