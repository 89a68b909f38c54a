//! OpenAI Whisper transcription implementation.

use super::{Transcriber, TranscriptSegment};
use crate::error::{Result, VidsearchError};
use crate::openai::create_client;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with a custom model and language hint.
    pub fn with_config(model: &str, language: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            language: language.map(str::to_string),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| VidsearchError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| VidsearchError::Transcription(format!("Whisper API error: {}", e)))?;

        let raw = response.segments.map(|segs| {
            segs.into_iter()
                .map(|s| (s.text, s.start as f64, s.end as f64))
                .collect::<Vec<_>>()
        });
        let segments = segments_from_response(raw, response.text, response.duration as f64);

        info!("Transcribed {} segments", segments.len());
        Ok(segments)
    }
}

/// Build segments from a verbose response.
///
/// Responses without segment data collapse into one segment spanning the
/// reported duration.
fn segments_from_response(
    segments: Option<Vec<(String, f64, f64)>>,
    full_text: String,
    duration: f64,
) -> Vec<TranscriptSegment> {
    match segments {
        Some(segs) if !segs.is_empty() => segs
            .into_iter()
            .map(|(text, start, end)| TranscriptSegment::new(text, start, end))
            .collect(),
        _ if full_text.trim().is_empty() => Vec::new(),
        _ => vec![TranscriptSegment::new(full_text, 0.0, duration)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_preserved_in_order() {
        let segments = segments_from_response(
            Some(vec![
                (" Hello".to_string(), 0.0, 2.5),
                (" world".to_string(), 2.5, 4.0),
            ]),
            "Hello world".to_string(),
            4.0,
        );

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, " Hello");
        assert_eq!(segments[1].start, 2.5);
    }

    #[test]
    fn test_missing_segments_fall_back_to_full_text() {
        let segments = segments_from_response(None, "Just text".to_string(), 12.0);
        assert_eq!(segments, vec![TranscriptSegment::new("Just text", 0.0, 12.0)]);
    }

    #[test]
    fn test_silent_audio_yields_no_segments() {
        let segments = segments_from_response(Some(vec![]), "  ".to_string(), 3.0);
        assert!(segments.is_empty());
    }
}
