//! Brute-force L2 index.
//!
//! Every query is compared against every stored vector. There is no
//! approximation or pruning, which keeps results exact at the collection
//! sizes this crate targets (tens of thousands of chunks).

use super::{distance_to_score, l2_distance, IndexedEntry, ScoredEntry, SnapshotStore, VectorIndex};
use crate::error::{Result, VidsearchError};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Append-only flat index with exact Euclidean search.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimension: usize,
    /// Row-major vector storage, `entries.len() * dimension` values.
    data: Vec<f32>,
    entries: Vec<IndexedEntry>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Rebuild an index from row-major vector data and entries.
    pub fn from_parts(dimension: usize, data: Vec<f32>, entries: Vec<IndexedEntry>) -> Result<Self> {
        let rows = if dimension == 0 { 0 } else { data.len() / dimension };
        if dimension > 0 && data.len() % dimension != 0 {
            return Err(VidsearchError::DimensionMismatch {
                expected: dimension,
                actual: data.len() % dimension,
            });
        }
        if rows != entries.len() {
            return Err(VidsearchError::CountMismatch {
                vectors: rows,
                entries: entries.len(),
            });
        }

        Ok(Self {
            dimension,
            data,
            entries,
        })
    }

    /// Stored metadata entries, in insertion order.
    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    /// Vector stored at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        if position >= self.entries.len() {
            return None;
        }
        let start = position * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Iterate over `(vector, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f32], &IndexedEntry)> {
        (0..self.entries.len()).filter_map(move |i| self.vector(i).map(|v| (v, &self.entries[i])))
    }

    /// Drop every entry matching `predicate`, keeping the rest in order.
    ///
    /// Returns the number of removed entries.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&IndexedEntry) -> bool,
    {
        let before = self.entries.len();
        let mut data = Vec::with_capacity(self.data.len());
        let mut entries = Vec::with_capacity(before);

        for (vector, entry) in self.iter() {
            if !predicate(entry) {
                data.extend_from_slice(vector);
                entries.push(entry.clone());
            }
        }

        self.data = data;
        self.entries = entries;

        let removed = before - self.entries.len();
        debug!("Removed {} entries from index", removed);
        removed
    }

    /// Write vectors and entries to a snapshot file, replacing its index.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn snapshot(&self, path: &Path) -> Result<()> {
        let mut store = SnapshotStore::open(path)?;
        store.write_index(self)?;
        info!("Saved index snapshot with {} vectors", self.len());
        Ok(())
    }

    /// Replace this index with the contents of a snapshot file.
    ///
    /// The snapshot must have been taken from an index of the same dimension.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn restore(&mut self, path: &Path) -> Result<()> {
        let store = SnapshotStore::open_existing(path)?;
        let restored = store
            .read_index()?
            .ok_or_else(|| VidsearchError::Snapshot("snapshot contains no index".to_string()))?;

        if restored.dimension != self.dimension {
            return Err(VidsearchError::DimensionMismatch {
                expected: self.dimension,
                actual: restored.dimension,
            });
        }

        *self = restored;
        info!("Restored index snapshot with {} vectors", self.len());
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn raw_data(&self) -> &[f32] {
        &self.data
    }
}

impl VectorIndex for FlatL2Index {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn add(&mut self, vectors: Vec<Vec<f32>>, entries: Vec<IndexedEntry>) -> Result<()> {
        if vectors.len() != entries.len() {
            return Err(VidsearchError::CountMismatch {
                vectors: vectors.len(),
                entries: entries.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(VidsearchError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in &vectors {
            self.data.extend_from_slice(vector);
        }
        self.entries.extend(entries);

        debug!("Added {} vectors to index. Total: {}", vectors.len(), self.len());
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(VidsearchError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut ranked: Vec<(usize, f32)> = self
            .iter()
            .enumerate()
            .map(|(position, (vector, _))| (position, l2_distance(query, vector)))
            .collect();

        // Stable sort: equal distances keep insertion order.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(position, distance)| ScoredEntry {
                entry: self.entries[position].clone(),
                distance,
                score: distance_to_score(distance),
            })
            .collect())
    }

    fn reset(&mut self) {
        self.data.clear();
        self.entries.clear();
        debug!("Cleared vector index");
    }
}
