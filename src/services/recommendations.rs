use std::sync::Arc;

use crate::{
    catalog::CatalogStore,
    error::AppResult,
    models::{RecommendedSong, Song},
    services::{enrichment, providers::MusicSearchProvider, similarity},
};

/// Everything a "show recommendation" action produces
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutcome {
    pub selected: Song,
    /// Player for the selected song itself
    pub now_playing_embed_url: Option<String>,
    pub songs: Vec<RecommendedSong>,
}

/// Looks up the songs most similar to `selected` and enriches them
///
/// The selected song is enriched alongside its neighbours in one concurrent
/// batch so the page can show its player too.
pub async fn get_recommendations(
    catalog: &CatalogStore,
    provider: Arc<dyn MusicSearchProvider>,
    selected: &Song,
) -> AppResult<RecommendationOutcome> {
    let similar = similarity::recommend(catalog, selected)?;

    let mut batch = Vec::with_capacity(similar.len() + 1);
    batch.push(selected.clone());
    batch.extend(similar.iter().cloned());

    let mut enriched = enrichment::enrich_batch(provider, &batch).await.into_iter();
    let now_playing_embed_url = enriched.next().and_then(|e| e.embed_url);

    let songs: Vec<RecommendedSong> = similar
        .iter()
        .zip(enriched)
        .map(|(song, enrichment)| RecommendedSong::new(song, enrichment))
        .collect();

    tracing::info!(
        song = %selected,
        results = songs.len(),
        "Recommendations built"
    );

    Ok(RecommendationOutcome {
        selected: selected.clone(),
        now_playing_embed_url,
        songs,
    })
}
