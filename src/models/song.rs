use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Separator between title and artist in the display string
pub const DISPLAY_SEPARATOR: &str = " - ";

/// A song from the catalog, identified by its (title, artist) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    /// Track title
    pub song: String,
    /// Performing artist
    pub artist: String,
}

impl Song {
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
        }
    }

    /// The `"{song} - {artist}"` string shown in the song picker
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

impl Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.song, DISPLAY_SEPARATOR, self.artist)
    }
}

/// Cover art and player reference for one song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub album_cover_url: String,
    pub embed_url: Option<String>,
}

/// A recommended song together with its enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSong {
    pub song: String,
    pub artist: String,
    pub display_name: String,
    pub album_cover_url: String,
    pub embed_url: Option<String>,
}

impl RecommendedSong {
    pub fn new(song: &Song, enrichment: Enrichment) -> Self {
        Self {
            song: song.song.clone(),
            artist: song.artist.clone(),
            display_name: song.display_name(),
            album_cover_url: enrichment.album_cover_url,
            embed_url: enrichment.embed_url,
        }
    }
}

/// Feedback on a set of recommendations; logged, never stored
#[derive(Debug, Clone, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub text: String,
    pub rating: u8,
}

impl Feedback {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    pub fn has_valid_rating(&self) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating)
    }
}
