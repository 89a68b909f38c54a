//! Search engine over indexed video transcripts.
//!
//! `SearchEngine` owns the video catalog and the vector index and is the only
//! way to mutate them. It does no locking of its own: callers sharing one
//! engine between tasks must serialize mutations against each other and
//! against searches. `SharedSearchEngine` provides that discipline with a
//! single reader/writer lock.

mod models;
mod shared;

pub use models::{
    IndexStats, SearchQuery, SearchResponse, SearchResult, VideoTranscript, DEFAULT_TOP_K,
};
pub use shared::SharedSearchEngine;

use crate::embedding::Embedder;
use crate::error::{Result, VidsearchError};
use crate::vector_store::{FlatL2Index, SnapshotKind, SnapshotStore, VectorIndex};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Catalog plus vector index, driven by one embedder.
pub struct SearchEngine {
    embedder: Arc<dyn Embedder>,
    index: FlatL2Index,
    catalog: BTreeMap<String, VideoTranscript>,
}

impl SearchEngine {
    /// Create an empty engine. The index dimension is taken from the embedder
    /// once and never changes.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        let dimension = embedder.dimensions();
        info!(
            "Initialized search engine (model {}, dimension {})",
            embedder.model_id(),
            dimension
        );

        Self {
            embedder,
            index: FlatL2Index::new(dimension),
            catalog: BTreeMap::new(),
        }
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the vector index.
    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    /// Catalogued videos, ordered by id.
    pub fn videos(&self) -> impl Iterator<Item = &VideoTranscript> {
        self.catalog.values()
    }

    /// Look up a catalogued video.
    pub fn get_video(&self, video_id: &str) -> Option<&VideoTranscript> {
        self.catalog.get(video_id)
    }

    /// Embed and index every chunk of a video, then record it in the catalog.
    ///
    /// Nothing changes unless the whole video is embedded and added. An
    /// existing catalog entry with the same id is replaced, but its previous
    /// vectors stay in the index; use [`SearchEngine::reindex_video`] to drop
    /// them first.
    #[instrument(skip(self, video), fields(video_id = %video.video_id, chunks = video.chunks.len()))]
    pub async fn index_video(&mut self, video: VideoTranscript) -> Result<usize> {
        let started = Instant::now();
        video.validate()?;

        let count = video.chunks.len();
        if count > 0 {
            let texts: Vec<String> = video.chunks.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            self.index.add(embeddings, video.indexed_entries())?;
        }

        if self.catalog.contains_key(&video.video_id) {
            warn!(
                "Video {} was already indexed; earlier chunks remain in the index",
                video.video_id
            );
        }

        info!(
            "Indexed video {} with {} chunks in {:.2}s",
            video.video_id,
            count,
            started.elapsed().as_secs_f64()
        );
        self.catalog.insert(video.video_id.clone(), video);
        Ok(count)
    }

    /// Index videos in order. A failure stops the batch; videos indexed
    /// before it stay indexed.
    pub async fn index_videos(&mut self, videos: Vec<VideoTranscript>) -> Result<usize> {
        let mut total = 0;
        for video in videos {
            total += self.index_video(video).await?;
        }
        Ok(total)
    }

    /// Replace a video: drop its catalog entry and vectors, then index it.
    pub async fn reindex_video(&mut self, video: VideoTranscript) -> Result<usize> {
        video.validate()?;

        let count = video.chunks.len();
        let embeddings = if count > 0 {
            let texts: Vec<String> = video.chunks.iter().map(|c| c.text.clone()).collect();
            Some(self.embedder.embed_batch(&texts).await?)
        } else {
            None
        };

        // Validate the new vectors before dropping the old ones.
        if let Some(vectors) = &embeddings {
            if vectors.len() != count {
                return Err(VidsearchError::CountMismatch {
                    vectors: vectors.len(),
                    entries: count,
                });
            }
            let dimension = self.index.dimension();
            if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
                return Err(VidsearchError::DimensionMismatch {
                    expected: dimension,
                    actual: bad.len(),
                });
            }
        }

        let removed = self.remove_video(&video.video_id);
        if let Some(embeddings) = embeddings {
            self.index.add(embeddings, video.indexed_entries())?;
        }

        info!(
            "Reindexed video {} ({} chunks replaced by {})",
            video.video_id, removed, count
        );
        self.catalog.insert(video.video_id.clone(), video);
        Ok(count)
    }

    /// Drop a video from the catalog and compact its vectors out of the index.
    ///
    /// Returns the number of removed chunks.
    pub fn remove_video(&mut self, video_id: &str) -> usize {
        self.catalog.remove(video_id);
        let removed = self.index.remove_where(|entry| entry.video_id == video_id);
        debug!("Removed video {} ({} chunks)", video_id, removed);
        removed
    }

    /// Find the chunks closest to `query`.
    ///
    /// `top_k` below 1 is treated as 1; asking for more results than are
    /// indexed returns everything. Results are ordered by ascending distance.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, top_k: i64) -> Result<Vec<SearchResult>> {
        let k = top_k.max(1) as usize;
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_embedding, k)?;

        debug!("Found {} matching chunks", hits.len());
        Ok(hits.into_iter().map(SearchResult::from).collect())
    }

    /// Run a caller-supplied query: rejects blank queries, echoes the query
    /// and reports processing time.
    pub async fn execute(&self, query: &SearchQuery) -> Result<SearchResponse> {
        if query.query.trim().is_empty() {
            return Err(VidsearchError::EmptyQuery);
        }

        let started = Instant::now();
        let results = self.search(&query.query, query.top_k()).await?;

        Ok(SearchResponse {
            results,
            query: query.query.clone(),
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Remove all vectors and catalog entries.
    pub fn clear_index(&mut self) {
        self.index.reset();
        self.catalog.clear();
        info!("Cleared all indexed data");
    }

    /// Current catalog and index sizes.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_videos: self.catalog.len(),
            total_chunks: self.index.len(),
            embedding_dimension: self.embedder.dimensions(),
        }
    }

    /// Write the index and catalog to a snapshot file.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let mut store = SnapshotStore::open(path)?;
        store.write_snapshot(&self.index, self.catalog.values())
    }

    /// Replace the index and catalog with a snapshot's contents.
    ///
    /// The snapshot must come from [`SearchEngine::save_snapshot`] on an
    /// engine with the same embedding dimension; nothing changes if loading
    /// fails.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_snapshot(&mut self, path: &Path) -> Result<()> {
        let store = SnapshotStore::open_existing(path)?;
        match store.kind()? {
            Some(SnapshotKind::Engine) => {}
            Some(SnapshotKind::Index) => {
                return Err(VidsearchError::Snapshot(
                    "snapshot holds an index without a catalog".to_string(),
                ));
            }
            None => {
                return Err(VidsearchError::Snapshot("snapshot contains no index".to_string()));
            }
        }

        let index = store
            .read_index()?
            .ok_or_else(|| VidsearchError::Snapshot("snapshot contains no index".to_string()))?;

        if index.dimension() != self.index.dimension() {
            return Err(VidsearchError::DimensionMismatch {
                expected: self.index.dimension(),
                actual: index.dimension(),
            });
        }

        let catalog = store.read_catalog()?;

        self.index = index;
        self.catalog = catalog
            .into_iter()
            .map(|video| (video.video_id.clone(), video))
            .collect();

        info!(
            "Loaded snapshot: {} videos, {} chunks",
            self.catalog.len(),
            self.index.len()
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chunking::TranscriptChunk;
    use crate::embedding::HashingEmbedder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn hashing_engine() -> SearchEngine {
        SearchEngine::new(Arc::new(HashingEmbedder::new(384).unwrap()))
    }

    pub(crate) fn video(id: &str, texts: &[&str]) -> VideoTranscript {
        VideoTranscript {
            video_id: id.to_string(),
            title: format!("{} title", id),
            duration: texts.len() as f64 * 30.0,
            chunks: texts
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    TranscriptChunk::new(format!("chunk_{}", i), *text, i as f64 * 30.0, (i + 1) as f64 * 30.0)
                })
                .collect(),
            created_at: None,
        }
    }

    pub(crate) fn cloud_video() -> VideoTranscript {
        video(
            "cloud",
            &[
                "AWS Lambda is a serverless compute service that runs your code in response to events",
                "React hooks let you use state and other React features in function components",
            ],
        )
    }

    /// Embedder that fails every call after the first `allowed` ones.
    struct FlakyEmbedder {
        inner: HashingEmbedder,
        allowed: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.allowed {
                return Err(VidsearchError::Embedding("model unavailable".to_string()));
            }
            self.inner.embed_batch(texts).await
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        fn model_id(&self) -> &str {
            "flaky"
        }
    }

    /// Embedder that claims one dimension but produces another.
    struct DriftingEmbedder;

    #[async_trait]
    impl Embedder for DriftingEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.5; 4]).collect())
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn model_id(&self) -> &str {
            "drifting"
        }
    }

    #[tokio::test]
    async fn test_end_to_end_lambda_query() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();

        let results = engine.search("What is AWS Lambda?", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].matched_text.contains("AWS Lambda"));
        assert_eq!(results[0].video_id, "cloud");
        assert_eq!(results[0].timestamp, 0.0);
        assert_eq!(results[0].end_time, 30.0);
        assert!(results[0].relevance_score > results[1].relevance_score);
    }

    #[tokio::test]
    async fn test_search_clamps_top_k() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();

        assert_eq!(engine.search("hooks", 0).await.unwrap().len(), 1);
        assert_eq!(engine.search("hooks", -3).await.unwrap().len(), 1);
        assert_eq!(engine.search("hooks", 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_empty_engine() {
        let engine = hashing_engine();
        assert!(engine.search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_rejects_blank_query() {
        let engine = hashing_engine();
        let err = engine.execute(&SearchQuery::new("   ", 5)).await.unwrap_err();
        assert!(matches!(err, VidsearchError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_execute_echoes_query() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();

        let response = engine
            .execute(&SearchQuery::new("Explain React hooks", 1))
            .await
            .unwrap();

        assert_eq!(response.query, "Explain React hooks");
        assert_eq!(response.results.len(), 1);
        assert!(response.results[0].matched_text.starts_with("React hooks"));
        assert!(response.processing_time_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_reindexing_same_id_duplicates_chunks() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.index_video(cloud_video()).await.unwrap();

        let stats = engine.stats();
        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_chunks, 4);
        assert_eq!(stats.embedding_dimension, 384);
    }

    #[tokio::test]
    async fn test_catalog_keeps_latest_version() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();

        let mut updated = video("cloud", &["Only one chunk now"]);
        updated.title = "Updated".to_string();
        engine.index_video(updated).await.unwrap();

        assert_eq!(engine.get_video("cloud").unwrap().title, "Updated");
        assert_eq!(engine.stats().total_chunks, 3);
    }

    #[tokio::test]
    async fn test_reindex_video_replaces_chunks() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.index_video(video("other", &["Flutter hot reload"])).await.unwrap();

        engine
            .reindex_video(video("cloud", &["Docker containers package applications"]))
            .await
            .unwrap();

        let stats = engine.stats();
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_chunks, 2);

        let results = engine.search("AWS Lambda", 5).await.unwrap();
        assert!(results.iter().all(|r| !r.matched_text.contains("Lambda")));
    }

    #[tokio::test]
    async fn test_remove_video() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.index_video(video("other", &["Flutter hot reload"])).await.unwrap();

        assert_eq!(engine.remove_video("cloud"), 2);
        assert_eq!(engine.remove_video("missing"), 0);

        let stats = engine.stats();
        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_chunks, 1);
    }

    #[tokio::test]
    async fn test_clear_index() {
        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.clear_index();

        let stats = engine.stats();
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.total_chunks, 0);
        assert!(engine.search("Lambda", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_video_leaves_earlier_videos_indexed() {
        let embedder = FlakyEmbedder {
            inner: HashingEmbedder::new(64).unwrap(),
            allowed: 1,
            calls: AtomicUsize::new(0),
        };
        let mut engine = SearchEngine::new(Arc::new(embedder));

        let result = engine
            .index_videos(vec![
                video("first", &["one", "two"]),
                video("second", &["three"]),
                video("third", &["four"]),
            ])
            .await;

        assert!(matches!(result, Err(VidsearchError::Embedding(_))));
        let stats = engine.stats();
        assert_eq!(stats.total_videos, 1);
        assert_eq!(stats.total_chunks, 2);
        assert!(engine.get_video("second").is_none());
    }

    #[tokio::test]
    async fn test_dimension_drift_fails_loudly() {
        let mut engine = SearchEngine::new(Arc::new(DriftingEmbedder));
        let err = engine.index_video(video("v", &["text"])).await.unwrap_err();

        assert!(matches!(err, VidsearchError::DimensionMismatch { expected: 8, actual: 4 }));
        assert_eq!(engine.stats().total_videos, 0);
        assert_eq!(engine.stats().total_chunks, 0);
    }

    #[tokio::test]
    async fn test_invalid_video_rejected_before_embedding() {
        let mut engine = hashing_engine();
        let mut bad = cloud_video();
        bad.chunks[1].chunk_id = "chunk_0".to_string();

        let err = engine.index_video(bad).await.unwrap_err();
        assert!(matches!(err, VidsearchError::InvalidInput(_)));
        assert_eq!(engine.stats().total_chunks, 0);
    }

    #[tokio::test]
    async fn test_video_without_chunks_is_catalogued() {
        let mut engine = hashing_engine();
        assert_eq!(engine.index_video(video("silent", &[])).await.unwrap(), 0);
        assert_eq!(engine.stats().total_videos, 1);
        assert_eq!(engine.stats().total_chunks, 0);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.index_video(video("other", &["Flutter hot reload keeps state"])).await.unwrap();
        engine.save_snapshot(&path).unwrap();

        let mut restored = hashing_engine();
        restored.load_snapshot(&path).unwrap();

        assert_eq!(restored.stats(), engine.stats());
        assert_eq!(restored.get_video("cloud"), engine.get_video("cloud"));

        let original = engine.search("serverless functions on AWS", 3).await.unwrap();
        let reloaded = restored.search("serverless functions on AWS", 3).await.unwrap();
        assert_eq!(original.len(), reloaded.len());
        for (a, b) in original.iter().zip(&reloaded) {
            assert_eq!(a.video_id, b.video_id);
            assert_eq!(a.matched_text, b.matched_text);
            assert!((a.relevance_score - b.relevance_score).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_index_snapshot_restore_into_fresh_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.index().snapshot(&path).unwrap();

        let mut fresh = FlatL2Index::new(384);
        fresh.restore(&path).unwrap();

        let query = engine.embedder().embed("React state").await.unwrap();
        let a = engine.index().search(&query, 2).unwrap();
        let b = fresh.search(&query, 2).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.entry, y.entry);
            assert!((x.score - y.score).abs() < 1e-6);
        }

        let mut wrong = FlatL2Index::new(16);
        assert!(matches!(
            wrong.restore(&path),
            Err(VidsearchError::DimensionMismatch { expected: 16, actual: 384 })
        ));
        assert!(wrong.is_empty());
    }

    #[tokio::test]
    async fn test_index_only_snapshot_is_not_an_engine_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();
        engine.save_snapshot(&path).unwrap();

        engine.clear_index();
        engine.index_video(video("other", &["Flutter hot reload keeps state"])).await.unwrap();
        engine.index().snapshot(&path).unwrap();

        let mut fresh = hashing_engine();
        let err = fresh.load_snapshot(&path).unwrap_err();
        assert!(matches!(err, VidsearchError::Snapshot(_)));
        assert_eq!(fresh.stats().total_videos, 0);
        assert_eq!(fresh.stats().total_chunks, 0);

        // The file is still a valid index snapshot.
        let mut index = FlatL2Index::new(384);
        index.restore(&path).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].video_id, "other");

        // Saving the engine again turns it back into an engine snapshot.
        engine.save_snapshot(&path).unwrap();
        fresh.load_snapshot(&path).unwrap();
        assert_eq!(fresh.videos().map(|v| v.video_id.as_str()).collect::<Vec<_>>(), vec!["other"]);
        assert_eq!(fresh.stats().total_chunks, 1);
    }

    #[tokio::test]
    async fn test_load_snapshot_with_other_dimension_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut small = SearchEngine::new(Arc::new(HashingEmbedder::new(32).unwrap()));
        small.index_video(video("v", &["small"])).await.unwrap();
        small.save_snapshot(&path).unwrap();

        let mut engine = hashing_engine();
        engine.index_video(cloud_video()).await.unwrap();

        let err = engine.load_snapshot(&path).unwrap_err();
        assert!(matches!(err, VidsearchError::DimensionMismatch { expected: 384, actual: 32 }));
        assert_eq!(engine.stats().total_chunks, 2);
        assert!(engine.get_video("cloud").is_some());
    }
}
