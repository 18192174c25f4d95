use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use music_recommender::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::{Song, TrackMatch},
    routes::{create_router, AppState},
    services::{
        chat::{INVALID_RESPONSE_REPLY, NETWORK_ERROR_REPLY},
        enrichment::PLACEHOLDER_COVER_URL,
        ChatResponder, GenerativeTextProvider, MusicSearchProvider,
    },
};

/// Knows every catalog song except "E"
struct FakeMusicSearch;

#[async_trait::async_trait]
impl MusicSearchProvider for FakeMusicSearch {
    async fn search_track(&self, song: &str, _artist: &str) -> AppResult<Option<TrackMatch>> {
        if song == "E" {
            return Ok(None);
        }
        Ok(Some(TrackMatch {
            image_urls: vec![format!("https://img/{}.jpg", song)],
            web_url: Some(format!("https://open.spotify.com/track/{}", song)),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Replies with a canned body, or fails like a dropped connection
struct FakeGenerativeText {
    body: Option<&'static str>,
}

#[async_trait::async_trait]
impl GenerativeTextProvider for FakeGenerativeText {
    async fn generate_content(&self, _prompt: &str) -> AppResult<String> {
        self.body
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalApi("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn test_catalog() -> CatalogStore {
    let songs = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .map(|n| Song::new(*n, "Band"))
        .collect();
    CatalogStore::new(
        songs,
        vec![
            vec![1.0, 0.8, 0.9, 0.3, 0.1, 0.5],
            vec![0.8, 1.0, 0.2, 0.4, 0.6, 0.1],
            vec![0.9, 0.2, 1.0, 0.7, 0.3, 0.2],
            vec![0.3, 0.4, 0.7, 1.0, 0.5, 0.6],
            vec![0.1, 0.6, 0.3, 0.5, 1.0, 0.9],
            vec![0.5, 0.1, 0.2, 0.6, 0.9, 1.0],
        ],
    )
    .unwrap()
}

fn create_test_server_with_chat(chat_body: Option<&'static str>) -> TestServer {
    let state = AppState::new(
        Arc::new(test_catalog()),
        Arc::new(FakeMusicSearch),
        ChatResponder::new(Arc::new(FakeGenerativeText { body: chat_body })),
    );
    let app = create_router(Arc::new(state));
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with_chat(Some(
        r#"{"candidates": [{"content": {"parts": [{"text": "Hello"}]}}]}"#,
    ))
}

async fn start_session(server: &TestServer) -> String {
    let response = server.post("/api/v1/sessions").await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["songs"], 6);
}

#[tokio::test]
async fn test_index_page_served() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Show Recommendation"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_songs_lists_catalog_enumeration() {
    let server = create_test_server();
    let response = server.get("/api/v1/songs").await;
    response.assert_status_ok();
    let songs: Vec<String> = response.json();
    assert_eq!(
        songs,
        vec!["A - Band", "B - Band", "C - Band", "D - Band", "E - Band", "F - Band"]
    );
}

#[tokio::test]
async fn test_new_session_is_idle() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    let response = server.get(&format!("/api/v1/sessions/{}", session_id)).await;
    response.assert_status_ok();
    let view: Value = response.json();
    assert_eq!(view["selected_song"], Value::Null);
    assert_eq!(view["now_playing_embed_url"], Value::Null);
    assert_eq!(view["recommendations"], json!([]));
}

#[tokio::test]
async fn test_recommendation_flow() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    let response = server
        .post(&format!("/api/v1/sessions/{}/recommendations", session_id))
        .json(&json!({ "song": "A - Band" }))
        .await;
    response.assert_status_ok();

    let view: Value = response.json();
    assert_eq!(view["selected_song"], "A - Band");
    assert_eq!(
        view["now_playing_embed_url"],
        "https://open.spotify.com/embed/track/A"
    );

    let recs = view["recommendations"].as_array().unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r["song"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["C", "B", "F", "D", "E"]);

    assert_eq!(recs[0]["album_cover_url"], "https://img/C.jpg");
    assert_eq!(recs[0]["embed_url"], "https://open.spotify.com/embed/track/C");
    assert_eq!(recs[4]["album_cover_url"], PLACEHOLDER_COVER_URL);
    assert_eq!(recs[4]["embed_url"], Value::Null);

    // Persisted in the session
    let stored: Value = server
        .get(&format!("/api/v1/sessions/{}", session_id))
        .await
        .json();
    assert_eq!(stored["recommendations"], view["recommendations"]);
}

#[tokio::test]
async fn test_new_recommendation_replaces_previous() {
    let server = create_test_server();
    let session_id = start_session(&server).await;
    let path = format!("/api/v1/sessions/{}/recommendations", session_id);

    server.post(&path).json(&json!({ "song": "A - Band" })).await;
    let response = server.post(&path).json(&json!({ "song": "E - Band" })).await;
    response.assert_status_ok();

    let view: Value = response.json();
    assert_eq!(view["selected_song"], "E - Band");
    // "E" has no provider match, so no player for the selection
    assert_eq!(view["now_playing_embed_url"], Value::Null);

    let names: Vec<&str> = view["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["song"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["F", "B", "D", "C", "A"]);
}

#[tokio::test]
async fn test_recommendation_rejects_free_text() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    let response = server
        .post(&format!("/api/v1/sessions/{}/recommendations", session_id))
        .json(&json!({ "song": "Something I typed - Myself" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Rejected selections leave the session untouched
    let view: Value = server
        .get(&format!("/api/v1/sessions/{}", session_id))
        .await
        .json();
    assert_eq!(view["selected_song"], Value::Null);
}

#[tokio::test]
async fn test_recommendation_unknown_session() {
    let server = create_test_server();
    let response = server
        .post(&format!(
            "/api/v1/sessions/{}/recommendations",
            uuid::Uuid::new_v4()
        ))
        .json(&json!({ "song": "A - Band" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let server = create_test_server();
    let session_id = start_session(&server).await;
    let path = format!("/api/v1/sessions/{}", session_id);

    server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_after_recommendations() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    server
        .post(&format!("/api/v1/sessions/{}/recommendations", session_id))
        .json(&json!({ "song": "B - Band" }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/api/v1/sessions/{}/feedback", session_id))
        .json(&json!({ "text": "Great picks", "rating": 5 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Thank you for your feedback!");
}

#[tokio::test]
async fn test_feedback_rating_out_of_range() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    server
        .post(&format!("/api/v1/sessions/{}/recommendations", session_id))
        .json(&json!({ "song": "B - Band" }))
        .await
        .assert_status_ok();

    for rating in [0, 6] {
        server
            .post(&format!("/api/v1/sessions/{}/feedback", session_id))
            .json(&json!({ "text": "", "rating": rating }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_feedback_requires_results() {
    let server = create_test_server();
    let session_id = start_session(&server).await;

    server
        .post(&format!("/api/v1/sessions/{}/feedback", session_id))
        .json(&json!({ "text": "Too early", "rating": 3 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_reply() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/chat")
        .json(&json!({ "query": "Say hello" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reply"], "Hello");
}

#[tokio::test]
async fn test_chat_network_error_is_soft() {
    let server = create_test_server_with_chat(None);
    let response = server
        .post("/api/v1/chat")
        .json(&json!({ "query": "Anything" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reply"], NETWORK_ERROR_REPLY);
}

#[tokio::test]
async fn test_chat_invalid_response_is_soft() {
    let server = create_test_server_with_chat(Some("<html>Bad Gateway</html>"));
    let response = server
        .post("/api/v1/chat")
        .json(&json!({ "query": "Anything" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reply"], INVALID_RESPONSE_REPLY);
}
