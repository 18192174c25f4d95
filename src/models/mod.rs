use serde::{Deserialize, Serialize};

pub mod session;
pub mod song;

pub use session::{SessionState, SessionView};
pub use song::{Enrichment, Feedback, RecommendedSong, Song, DISPLAY_SEPARATOR};

// ============================================================================
// Spotify Web API Types
// ============================================================================

/// Client-credentials token response from the accounts service
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Response from GET /search?type=track
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchResponse {
    #[serde(default)]
    pub tracks: Option<SpotifyPage<SpotifyTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub external_urls: SpotifyExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// The first matching track, reduced to what enrichment needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    /// Album images in provider order; the first is used as cover
    pub image_urls: Vec<String>,
    /// Canonical web URL of the track
    pub web_url: Option<String>,
}

impl From<SpotifyTrack> for TrackMatch {
    fn from(track: SpotifyTrack) -> Self {
        TrackMatch {
            image_urls: track.album.images.into_iter().map(|i| i.url).collect(),
            web_url: track.external_urls.spotify,
        }
    }
}

// ============================================================================
// Gemini API Types
// ============================================================================

/// Request body for models/{model}:generateContent
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single-turn request carrying one text prompt
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: Some(vec![Part {
                    text: Some(prompt.to_string()),
                }]),
            }],
        }
    }
}

/// Response body from models/{model}:generateContent
///
/// Lists are optional so that an explicit `null` reads the same as a missing
/// field.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Chat sidebar request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

/// Chat sidebar response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_search_deserialization() {
        let json = r#"{
            "tracks": {
                "href": "https://api.spotify.com/v1/search?query=track%3AWaterloo",
                "items": [{
                    "name": "Waterloo",
                    "album": {
                        "name": "Waterloo",
                        "images": [
                            {"url": "https://i.scdn.co/image/640", "height": 640, "width": 640},
                            {"url": "https://i.scdn.co/image/300", "height": 300, "width": 300}
                        ]
                    },
                    "external_urls": {"spotify": "https://open.spotify.com/track/abc"}
                }]
            }
        }"#;

        let response: SpotifySearchResponse = serde_json::from_str(json).unwrap();
        let track = response.tracks.unwrap().items.remove(0);
        let found = TrackMatch::from(track);

        assert_eq!(
            found.image_urls,
            vec![
                "https://i.scdn.co/image/640".to_string(),
                "https://i.scdn.co/image/300".to_string()
            ]
        );
        assert_eq!(
            found.web_url,
            Some("https://open.spotify.com/track/abc".to_string())
        );
    }

    #[test]
    fn test_spotify_search_empty_items() {
        let json = r#"{"tracks": {"items": []}}"#;
        let response: SpotifySearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.tracks.unwrap().items.is_empty());
    }

    #[test]
    fn test_generate_content_request_shape() {
        let request = GenerateContentRequest::from_prompt("Who wrote Fernando?");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "Who wrote Fernando?"}]}]})
        );
    }

    #[test]
    fn test_generate_content_response_tolerates_missing_fields() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let candidates = response.candidates.unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].content.is_none());
    }

    #[test]
    fn test_generate_content_response_accepts_null_lists() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": null}"#).unwrap();
        assert!(response.candidates.is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": null}}]}"#).unwrap();
        let content = response.candidates.unwrap().remove(0).content.unwrap();
        assert!(content.parts.is_none());
    }
}
