//! Vector index for exact nearest-neighbor search over chunk embeddings.
//!
//! Vectors are stored alongside a parallel list of metadata entries: the entry
//! at position `i` describes the vector at position `i`. Every mutation
//! validates its whole input before touching either side, so the two lists
//! always have the same length.

mod flat;
mod sqlite;

pub use flat::FlatL2Index;
pub use sqlite::{SnapshotKind, SnapshotStore};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Metadata stored for each indexed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntry {
    /// Video this chunk belongs to.
    pub video_id: String,
    /// Video title.
    pub video_title: String,
    /// Chunk identifier within the video.
    pub chunk_id: String,
    /// Start time in the video (seconds).
    pub start_time: f64,
    /// End time in the video (seconds).
    pub end_time: f64,
    /// Text content of this chunk.
    pub text: String,
}

/// A search hit with its distance and derived similarity score.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// The matched entry.
    pub entry: IndexedEntry,
    /// Euclidean distance to the query.
    pub distance: f32,
    /// Similarity score in (0, 1], higher is better.
    pub score: f32,
}

/// Trait for vector index implementations.
pub trait VectorIndex: Send + Sync {
    /// Fixed vector dimension of this index.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append vectors with their metadata entries.
    fn add(&mut self, vectors: Vec<Vec<f32>>, entries: Vec<IndexedEntry>) -> Result<()>;

    /// Return up to `k` entries ordered by ascending distance to `query`.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>>;

    /// Remove all vectors and entries.
    fn reset(&mut self);
}

/// Euclidean distance between two vectors of equal length.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Convert a distance to a similarity score: `1 / (1 + distance)`.
pub fn distance_to_score(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_distance() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_distance_to_score() {
        assert_eq!(distance_to_score(0.0), 1.0);
        assert_eq!(distance_to_score(1.0), 0.5);
        assert!(distance_to_score(3.0) < distance_to_score(2.0));
        assert!(distance_to_score(1e6) > 0.0);
    }
}
