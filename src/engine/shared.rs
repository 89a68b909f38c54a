//! Engine handle for concurrent callers.

use super::{IndexStats, SearchEngine, SearchQuery, SearchResponse, SearchResult, VideoTranscript};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to one engine behind a reader/writer lock.
///
/// Searches and reads run concurrently; indexing, removal, clearing and
/// snapshot loading take the lock exclusively, so a search never observes a
/// video whose chunks are half added.
#[derive(Clone)]
pub struct SharedSearchEngine {
    inner: Arc<RwLock<SearchEngine>>,
}

impl SharedSearchEngine {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub async fn index_video(&self, video: VideoTranscript) -> Result<usize> {
        self.inner.write().await.index_video(video).await
    }

    pub async fn index_videos(&self, videos: Vec<VideoTranscript>) -> Result<usize> {
        self.inner.write().await.index_videos(videos).await
    }

    pub async fn reindex_video(&self, video: VideoTranscript) -> Result<usize> {
        self.inner.write().await.reindex_video(video).await
    }

    pub async fn remove_video(&self, video_id: &str) -> usize {
        self.inner.write().await.remove_video(video_id)
    }

    pub async fn search(&self, query: &str, top_k: i64) -> Result<Vec<SearchResult>> {
        self.inner.read().await.search(query, top_k).await
    }

    pub async fn execute(&self, query: &SearchQuery) -> Result<SearchResponse> {
        self.inner.read().await.execute(query).await
    }

    pub async fn clear_index(&self) {
        self.inner.write().await.clear_index();
    }

    pub async fn stats(&self) -> IndexStats {
        self.inner.read().await.stats()
    }

    /// Catalogued videos, cloned out of the lock.
    pub async fn videos(&self) -> Vec<VideoTranscript> {
        self.inner.read().await.videos().cloned().collect()
    }

    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.inner.read().await.save_snapshot(path)
    }

    pub async fn load_snapshot(&self, path: &Path) -> Result<()> {
        self.inner.write().await.load_snapshot(path)
    }
}

impl From<SearchEngine> for SharedSearchEngine {
    fn from(engine: SearchEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{cloud_video, hashing_engine, video};

    #[tokio::test]
    async fn test_concurrent_searches_during_indexing() {
        let shared = SharedSearchEngine::new(hashing_engine());
        shared.index_video(cloud_video()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = shared.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    engine
                        .index_video(video(&format!("extra_{}", i), &["Kubernetes pods", "Terraform state"]))
                        .await
                        .map(|_| 0)
                } else {
                    engine.search("AWS Lambda", 3).await.map(|r| r.len())
                }
            }));
        }

        for handle in handles {
            let count = handle.await.unwrap().unwrap();
            assert!(count <= 3);
        }

        let stats = shared.stats().await;
        assert_eq!(stats.total_videos, 5);
        assert_eq!(stats.total_chunks, 10);
    }

    #[tokio::test]
    async fn test_shared_remove_and_clear() {
        let shared: SharedSearchEngine = hashing_engine().into();
        shared.index_video(cloud_video()).await.unwrap();
        shared.index_video(video("other", &["Flutter"])).await.unwrap();

        assert_eq!(shared.remove_video("other").await, 1);
        assert_eq!(shared.videos().await.len(), 1);

        shared.clear_index().await;
        assert_eq!(shared.stats().await.total_chunks, 0);
        assert!(shared.search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shared_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        let shared = SharedSearchEngine::new(hashing_engine());
        shared.index_video(cloud_video()).await.unwrap();
        shared.save_snapshot(&path).await.unwrap();

        let restored = SharedSearchEngine::new(hashing_engine());
        restored.load_snapshot(&path).await.unwrap();
        assert_eq!(restored.stats().await, shared.stats().await);

        let response = restored
            .execute(&SearchQuery::new("What is AWS Lambda?", 1))
            .await
            .unwrap();
        assert!(response.results[0].matched_text.contains("Lambda"));
    }
}
