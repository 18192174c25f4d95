use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::RecommendedSong;

/// Presentation state for one interactive session
///
/// Replaced wholesale by every recommendation request; nothing else mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Display string of the last selected song
    pub selected_song: Option<String>,
    /// Player reference for the selected song
    pub now_playing_embed_url: Option<String>,
    /// Last recommendation result
    pub recommendations: Vec<RecommendedSong>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// State after a completed recommendation request
    pub fn showing_results(
        selected_song: String,
        now_playing_embed_url: Option<String>,
        recommendations: Vec<RecommendedSong>,
    ) -> Self {
        Self {
            selected_song: Some(selected_song),
            now_playing_embed_url,
            recommendations,
            updated_at: Some(Utc::now()),
        }
    }

    pub fn has_results(&self) -> bool {
        !self.recommendations.is_empty()
    }
}

/// Session state as returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub selected_song: Option<String>,
    pub now_playing_embed_url: Option<String>,
    pub recommendations: Vec<RecommendedSong>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionView {
    pub fn new(session_id: Uuid, state: &SessionState) -> Self {
        Self {
            session_id,
            selected_song: state.selected_song.clone(),
            now_playing_embed_url: state.now_playing_embed_url.clone(),
            recommendations: state.recommendations.clone(),
            updated_at: state.updated_at,
        }
    }
}
