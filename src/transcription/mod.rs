//! Transcription engine contract.
//!
//! The speech-to-text model is a black box: given an audio file it returns an
//! ordered sequence of time-coded segments spanning the whole recording.
//! Failures are returned unchanged and never retried, since a partial
//! transcript is not a usable state.

mod models;
mod whisper;

pub use models::{format_timestamp, total_duration, TranscriptSegment};
pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription engines.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into ordered segments with timestamps.
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>>;
}
