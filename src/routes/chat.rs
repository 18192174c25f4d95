use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    middleware::request_id::RequestId,
    models::{ChatRequest, ChatResponse},
};

use super::AppState;

/// Handler for the chat sidebar
///
/// Always succeeds; provider failures come back as fixed replies.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::info!(
        request_id = %request_id,
        query_len = request.query.len(),
        "Processing chat request"
    );

    let reply = state.chat.ask(&request.query).await;
    Json(ChatResponse { reply })
}
