use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod chat;
pub mod recommendations;
pub mod sessions;
pub mod songs;
pub mod state;

pub use state::{AppState, SessionStore};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/songs", get(songs::list))
        .route("/sessions", post(sessions::create))
        .route(
            "/sessions/:session_id",
            get(sessions::get).delete(sessions::delete),
        )
        .route(
            "/sessions/:session_id/recommendations",
            post(recommendations::recommend),
        )
        .route(
            "/sessions/:session_id/feedback",
            post(recommendations::feedback),
        )
        .route("/chat", post(chat::ask))
}

/// Single-page front end
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "songs": state.catalog.len() })),
    )
}
