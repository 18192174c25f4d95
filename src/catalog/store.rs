use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::models::Song;

/// Errors raised while loading the precomputed catalog artifacts
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("song table is empty")]
    Empty,

    #[error("similarity matrix has {rows} rows but the song table has {songs} songs")]
    RowCount { rows: usize, songs: usize },

    #[error("similarity row {row} has {len} columns, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("similarity score at ({row}, {column}) is not finite")]
    NonFinite { row: usize, column: usize },
}

/// Read-only song table and similarity matrix
///
/// Row `i` of the matrix describes the same song as `songs[i]`. Both are
/// loaded once at startup and never mutated.
#[derive(Debug)]
pub struct CatalogStore {
    songs: Vec<Song>,
    similarity: Vec<Vec<f64>>,
    /// (song, artist) -> first row carrying that pair
    key_index: HashMap<Song, usize>,
    /// display string -> first row carrying that string
    display_index: HashMap<String, usize>,
    /// Unique display strings in first-seen order
    enumeration: Vec<String>,
}

impl CatalogStore {
    /// Builds a store from in-memory data, validating alignment
    pub fn new(songs: Vec<Song>, similarity: Vec<Vec<f64>>) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }
        if similarity.len() != songs.len() {
            return Err(CatalogError::RowCount {
                rows: similarity.len(),
                songs: songs.len(),
            });
        }
        for (row, scores) in similarity.iter().enumerate() {
            if scores.len() != songs.len() {
                return Err(CatalogError::RowLength {
                    row,
                    len: scores.len(),
                    expected: songs.len(),
                });
            }
            if let Some(column) = scores.iter().position(|s| !s.is_finite()) {
                return Err(CatalogError::NonFinite { row, column });
            }
        }

        let mut key_index = HashMap::with_capacity(songs.len());
        let mut display_index = HashMap::with_capacity(songs.len());
        let mut enumeration = Vec::with_capacity(songs.len());

        for (index, song) in songs.iter().enumerate() {
            key_index.entry(song.clone()).or_insert(index);

            let display = song.display_name();
            if !display_index.contains_key(&display) {
                display_index.insert(display.clone(), index);
                enumeration.push(display);
            }
        }

        Ok(Self {
            songs,
            similarity,
            key_index,
            display_index,
            enumeration,
        })
    }

    /// Loads the song table and similarity matrix from their JSON artifacts
    pub fn load(
        songs_path: impl AsRef<Path>,
        similarity_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let songs: Vec<Song> = read_json(songs_path.as_ref())?;
        let similarity: Vec<Vec<f64>> = read_json(similarity_path.as_ref())?;

        let store = Self::new(songs, similarity)?;

        tracing::info!(
            songs = store.len(),
            unique = store.enumeration.len(),
            "Loaded song catalog"
        );

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn song(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Similarity row for the song at `index`
    pub fn similarity_row(&self, index: usize) -> Option<&[f64]> {
        self.similarity.get(index).map(Vec::as_slice)
    }

    /// Row index of the first record matching `(song, artist)` exactly
    pub fn index_of(&self, song: &Song) -> Option<usize> {
        self.key_index.get(song).copied()
    }

    /// Resolves a picker value back to its song record
    pub fn resolve_display(&self, display: &str) -> Option<&Song> {
        self.display_index
            .get(display)
            .and_then(|&index| self.songs.get(index))
    }

    /// The values offered by the song picker
    pub fn enumeration(&self) -> &[String] {
        &self.enumeration
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
