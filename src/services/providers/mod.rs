//! External data providers
//!
//! Two seams: music search (cover art and player links) and generative text
//! (the chat sidebar). The HTTP-backed implementations live in the submodules;
//! tests substitute mocks or fakes.

use crate::{error::AppResult, models::TrackMatch};

pub mod gemini;
pub mod spotify;

/// Trait for music metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicSearchProvider: Send + Sync {
    /// Search for a track by title and artist as separate structured fields
    ///
    /// Returns the first match, or `None` when the provider has no result.
    async fn search_track(&self, song: &str, artist: &str) -> AppResult<Option<TrackMatch>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for generative text providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeTextProvider: Send + Sync {
    /// Send a single text prompt and return the raw response body
    ///
    /// Any `Err` is a transport-level failure (connection, timeout, non-2xx).
    /// The body is returned unparsed so callers can tell malformed payloads
    /// apart from network errors.
    async fn generate_content(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
