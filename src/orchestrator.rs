//! Ingestion pipeline for vidsearch.
//!
//! Coordinates the process from an audio file to indexed chunks:
//! transcribe, chunk, assemble a `VideoTranscript`, then index it.

use crate::chunking::{Chunker, ChunkingConfig, TemporalChunker};
use crate::config::Settings;
use crate::engine::{SharedSearchEngine, VideoTranscript};
use crate::error::{Result, VidsearchError};
use crate::transcription::{total_duration, Transcriber, WhisperTranscriber};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the ingestion pipeline.
pub struct Orchestrator {
    transcriber: Arc<dyn Transcriber>,
    chunker: TemporalChunker,
    engine: SharedSearchEngine,
}

impl Orchestrator {
    /// Create an orchestrator that transcribes with Whisper.
    pub fn new(settings: &Settings, engine: SharedSearchEngine) -> Result<Self> {
        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.language_hint(),
        )?);

        Ok(Self::with_components(settings, transcriber, engine))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        transcriber: Arc<dyn Transcriber>,
        engine: SharedSearchEngine,
    ) -> Self {
        let chunker = TemporalChunker::new(ChunkingConfig {
            target_duration: settings.chunking.target_chunk_seconds,
        });

        Self {
            transcriber,
            chunker,
            engine,
        }
    }

    /// Get the engine handle.
    pub fn engine(&self) -> &SharedSearchEngine {
        &self.engine
    }

    /// Transcribe and chunk an audio file without indexing it.
    #[instrument(skip(self), fields(audio = %audio_path.display()))]
    pub async fn transcribe_media(
        &self,
        audio_path: &Path,
        video_id: &str,
        title: &str,
    ) -> Result<VideoTranscript> {
        if video_id.trim().is_empty() {
            return Err(VidsearchError::InvalidInput("video_id cannot be empty".to_string()));
        }
        if !audio_path.is_file() {
            return Err(VidsearchError::InvalidInput(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        info!("Transcribing audio...");
        let segments = self.transcriber.transcribe(audio_path).await?;
        info!("Transcription complete ({} segments)", segments.len());

        let chunks = self.chunker.chunk(&segments);
        info!("Created {} chunks", chunks.len());

        Ok(VideoTranscript {
            video_id: video_id.to_string(),
            title: title.to_string(),
            duration: total_duration(&segments),
            chunks,
            created_at: Some(Utc::now()),
        })
    }

    /// Process media: transcribe, chunk, embed, and index.
    ///
    /// With `replace`, chunks from an earlier indexing of the same id are
    /// removed first; otherwise they stay alongside the new ones.
    pub async fn process_media(
        &self,
        audio_path: &Path,
        video_id: &str,
        title: &str,
        replace: bool,
    ) -> Result<ProcessResult> {
        let video = self.transcribe_media(audio_path, video_id, title).await?;
        let duration = video.duration;

        let chunks_indexed = if replace {
            self.engine.reindex_video(video).await?
        } else {
            self.engine.index_video(video).await?
        };

        Ok(ProcessResult {
            video_id: video_id.to_string(),
            title: title.to_string(),
            duration,
            chunks_indexed,
        })
    }
}

/// Result of processing media.
#[derive(Debug)]
pub struct ProcessResult {
    /// Video ID.
    pub video_id: String,
    /// Title.
    pub title: String,
    /// Transcript duration in seconds.
    pub duration: f64,
    /// Number of chunks indexed.
    pub chunks_indexed: usize,
}
