use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::Song,
};

/// Number of songs returned per recommendation
pub const RECOMMENDATION_COUNT: usize = 5;

/// Returns the songs most similar to `selected`, best first
///
/// Ranking is by the precomputed similarity row of `selected`, descending.
/// Equal scores keep catalog order. The selected row itself is never part
/// of the result. `selected` must come from the catalog; a miss means the
/// picker and the catalog disagree and is reported as an internal error.
pub fn recommend(catalog: &CatalogStore, selected: &Song) -> AppResult<Vec<Song>> {
    let index = catalog.index_of(selected).ok_or_else(|| {
        tracing::error!(song = %selected, "Selected song is not in the catalog");
        AppError::Internal(format!("song not in catalog: {}", selected))
    })?;

    let row = catalog
        .similarity_row(index)
        .ok_or_else(|| AppError::Internal(format!("missing similarity row {}", index)))?;

    let ranked = rank(row, index, RECOMMENDATION_COUNT);

    let songs = ranked
        .into_iter()
        .filter_map(|(i, _)| catalog.song(i).cloned())
        .collect();

    Ok(songs)
}

/// Top `limit` (index, score) pairs of `row`, excluding `exclude`
///
/// Uses a stable sort so the first-seen index wins on equal scores.
pub fn rank(row: &[f64], exclude: usize, limit: usize) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != exclude)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored
}
