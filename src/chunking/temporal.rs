//! Duration-bounded chunking.
//!
//! Segments accumulate until adding the next one would stretch the chunk past
//! the target duration, measured from the chunk's first segment start to the
//! incoming segment's end. A closed chunk ends where the next one starts, so
//! chunk boundaries follow segment starts rather than the previous segment's
//! end.

use super::{Chunker, ChunkingConfig, TranscriptChunk};
use crate::transcription::TranscriptSegment;
use tracing::debug;

/// Time-based chunker.
pub struct TemporalChunker {
    config: ChunkingConfig,
}

impl TemporalChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Create a chunker with a target duration in seconds.
    pub fn with_duration(target_duration: f64) -> Self {
        Self::new(ChunkingConfig { target_duration })
    }
}

impl Default for TemporalChunker {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

impl Chunker for TemporalChunker {
    fn chunk(&self, segments: &[TranscriptSegment]) -> Vec<TranscriptChunk> {
        let Some(first) = segments.first() else {
            return Vec::new();
        };

        let mut chunks = Vec::new();
        let mut pending = ChunkBuilder::default();
        let mut chunk_start = first.start;

        for segment in segments {
            if segment.end - chunk_start > self.config.target_duration && !pending.is_empty() {
                pending.emit(&mut chunks, chunk_start, segment.start);
                chunk_start = segment.start;
            }
            pending.push(&segment.text);
        }

        let last_end = segments.last().map(|s| s.end).unwrap_or(chunk_start);
        pending.emit(&mut chunks, chunk_start, last_end);

        debug!(
            "Chunked {} segments into {} chunks (target {}s)",
            segments.len(),
            chunks.len(),
            self.config.target_duration
        );
        chunks
    }
}

/// Accumulates trimmed segment texts for the chunk being built.
#[derive(Default)]
struct ChunkBuilder {
    texts: Vec<String>,
    next_id: usize,
}

impl ChunkBuilder {
    fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn push(&mut self, text: &str) {
        self.texts.push(text.trim().to_string());
    }

    /// Close the pending chunk. Blank chunks are dropped without consuming an id.
    fn emit(&mut self, chunks: &mut Vec<TranscriptChunk>, start: f64, end: f64) {
        if self.texts.is_empty() {
            return;
        }

        let text = self.texts.join(" ").trim().to_string();
        self.texts.clear();

        if text.is_empty() {
            return;
        }

        chunks.push(TranscriptChunk::new(
            format!("chunk_{}", self.next_id),
            text,
            round2(start),
            round2(end),
        ));
        self.next_id += 1;
    }
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
