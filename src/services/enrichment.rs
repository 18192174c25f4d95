use std::sync::Arc;

use crate::{
    models::{Enrichment, Song, TrackMatch},
    services::providers::MusicSearchProvider,
};

/// Cover shown when the provider has no usable album art
pub const PLACEHOLDER_COVER_URL: &str = "https://i.postimg.cc/0QNxYz4V/social.png";

const WEB_PLAYER_HOST: &str = "open.spotify.com";
const EMBED_PLAYER_PREFIX: &str = "open.spotify.com/embed";

impl Enrichment {
    /// Placeholder cover, no player
    pub fn placeholder() -> Self {
        Self {
            album_cover_url: PLACEHOLDER_COVER_URL.to_string(),
            embed_url: None,
        }
    }
}

impl From<Option<TrackMatch>> for Enrichment {
    fn from(found: Option<TrackMatch>) -> Self {
        match found {
            Some(track) => Self {
                album_cover_url: track
                    .image_urls
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| PLACEHOLDER_COVER_URL.to_string()),
                embed_url: track.web_url.as_deref().map(embed_url),
            },
            None => Self::placeholder(),
        }
    }
}

/// Rewrites a track's web URL into its embeddable player URL
pub fn embed_url(web_url: &str) -> String {
    web_url.replacen(WEB_PLAYER_HOST, EMBED_PLAYER_PREFIX, 1)
}

/// Fetches cover art and player link for one song
///
/// Never fails: provider errors degrade to the same placeholder used when
/// nothing matches.
pub async fn enrich(provider: &dyn MusicSearchProvider, song: &str, artist: &str) -> Enrichment {
    match provider.search_track(song, artist).await {
        Ok(found) => Enrichment::from(found),
        Err(e) => {
            tracing::warn!(
                error = %e,
                song = %song,
                artist = %artist,
                provider = provider.name(),
                "Enrichment failed, using placeholder"
            );
            Enrichment::placeholder()
        }
    }
}

/// Enriches several songs concurrently, preserving input order
pub async fn enrich_batch(
    provider: Arc<dyn MusicSearchProvider>,
    songs: &[Song],
) -> Vec<Enrichment> {
    let mut tasks = Vec::with_capacity(songs.len());

    for song in songs {
        let provider = provider.clone();
        let song = song.clone();
        let task = tokio::spawn(async move { enrich(provider.as_ref(), &song.song, &song.artist).await });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(enrichment) => results.push(enrichment),
            Err(e) => {
                tracing::error!(error = %e, "Enrichment task join error");
                results.push(Enrichment::placeholder());
            }
        }
    }

    results
}
