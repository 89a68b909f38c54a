//! Chunking of time-coded transcript segments into searchable units.
//!
//! A chunk is a contiguous, bounded-duration span of transcript text that is
//! embedded and retrieved as one unit.

mod temporal;

pub use temporal::TemporalChunker;

use crate::transcription::TranscriptSegment;
use serde::{Deserialize, Serialize};

/// A chunk of transcript text with its time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    /// Identifier, unique within its video.
    pub chunk_id: String,
    /// Text content of this chunk.
    pub text: String,
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
}

impl TranscriptChunk {
    /// Create a new transcript chunk.
    pub fn new(chunk_id: impl Into<String>, text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            text: text.into(),
            start_time,
            end_time,
        }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Target chunk duration in seconds.
    pub target_duration: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_duration: 30.0,
        }
    }
}

/// Trait for transcript chunking implementations.
pub trait Chunker: Send + Sync {
    /// Group ordered segments into ordered chunks.
    fn chunk(&self, segments: &[TranscriptSegment]) -> Vec<TranscriptChunk>;
}
