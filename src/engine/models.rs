//! Catalog and query data models.

use crate::chunking::TranscriptChunk;
use crate::error::{Result, VidsearchError};
use crate::transcription::format_timestamp;
use crate::vector_store::{IndexedEntry, ScoredEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default number of results for a query.
pub const DEFAULT_TOP_K: i64 = 5;

/// A video with its chunked transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTranscript {
    /// Globally unique video identifier.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Total duration in seconds.
    pub duration: f64,
    /// Ordered transcript chunks.
    pub chunks: Vec<TranscriptChunk>,
    /// When the transcript was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VideoTranscript {
    /// Check the record before it enters the index.
    pub fn validate(&self) -> Result<()> {
        if self.video_id.trim().is_empty() {
            return Err(VidsearchError::InvalidInput("video_id cannot be empty".to_string()));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(VidsearchError::InvalidInput(format!(
                "video {} has invalid duration {}",
                self.video_id, self.duration
            )));
        }

        let mut seen = HashSet::new();
        for chunk in &self.chunks {
            if !seen.insert(chunk.chunk_id.as_str()) {
                return Err(VidsearchError::InvalidInput(format!(
                    "video {} has duplicate chunk id {}",
                    self.video_id, chunk.chunk_id
                )));
            }
            if chunk.text.trim().is_empty() {
                return Err(VidsearchError::InvalidInput(format!(
                    "chunk {} of video {} has no text",
                    chunk.chunk_id, self.video_id
                )));
            }
            let times_ok = chunk.start_time.is_finite()
                && chunk.end_time.is_finite()
                && chunk.start_time >= 0.0
                && chunk.end_time >= chunk.start_time;
            if !times_ok {
                return Err(VidsearchError::InvalidInput(format!(
                    "chunk {} of video {} has invalid time span {}..{}",
                    chunk.chunk_id, self.video_id, chunk.start_time, chunk.end_time
                )));
            }
        }

        Ok(())
    }

    /// Metadata entries for each chunk, in chunk order.
    pub fn indexed_entries(&self) -> Vec<IndexedEntry> {
        self.chunks
            .iter()
            .map(|chunk| IndexedEntry {
                video_id: self.video_id.clone(),
                video_title: self.title.clone(),
                chunk_id: chunk.chunk_id.clone(),
                start_time: chunk.start_time,
                end_time: chunk.end_time,
                text: chunk.text.clone(),
            })
            .collect()
    }
}

/// A search request as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: Option<i64>,
}

fn default_top_k() -> Option<i64> {
    Some(DEFAULT_TOP_K)
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, top_k: i64) -> Self {
        Self {
            query: query.into(),
            top_k: Some(top_k),
        }
    }

    /// Requested result count, falling back to the default.
    pub fn top_k(&self) -> i64 {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }
}

/// A ranked, timestamped match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub video_id: String,
    pub video_title: String,
    /// Start of the matched chunk in seconds.
    pub timestamp: f64,
    pub end_time: f64,
    pub matched_text: String,
    pub relevance_score: f32,
}

impl SearchResult {
    /// Format the start timestamp for display.
    pub fn format_timestamp(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

impl From<ScoredEntry> for SearchResult {
    fn from(hit: ScoredEntry) -> Self {
        Self {
            video_id: hit.entry.video_id,
            video_title: hit.entry.video_title,
            timestamp: hit.entry.start_time,
            end_time: hit.entry.end_time,
            matched_text: hit.entry.text,
            relevance_score: hit.score,
        }
    }
}

/// Results of one query, with the echoed query and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query: String,
    pub processing_time_ms: f64,
}

/// Index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_videos: usize,
    pub total_chunks: usize,
    pub embedding_dimension: usize,
}
