use std::sync::Arc;

use axum::{extract::State, Json};

use super::AppState;

/// Handler for the song picker values
///
/// These display strings are the only values the recommendation endpoint
/// accepts.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.enumeration().to_vec())
}
