//! Transcribe command implementation.

use super::open_engine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::create_embedder;
use crate::engine::{SearchEngine, SharedSearchEngine};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the transcribe command.
pub async fn run_transcribe(
    audio: &Path,
    video_id: &str,
    title: Option<String>,
    output: Option<PathBuf>,
    replace: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcribe, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let title = title.unwrap_or_else(|| default_title(audio));

    // If --output is specified, just transcribe and export (no indexing)
    if let Some(output_path) = output {
        return run_transcribe_only(audio, video_id, &title, &output_path, settings).await;
    }

    Output::info(&format!("Processing: {}", audio.display()));

    let engine = SharedSearchEngine::new(open_engine(&settings)?);
    let replace = replace || settings.search.replace_on_reindex;
    let orchestrator = Orchestrator::new(&settings, engine.clone())?;

    let spinner = Output::spinner("Transcribing and indexing...");
    let result = orchestrator.process_media(audio, video_id, &title, replace).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            engine.save_snapshot(&settings.snapshot_path()).await?;
            Output::success(&format!(
                "Successfully indexed '{}' ({} chunks)",
                result.title, result.chunks_indexed
            ));
            Output::kv("Video ID", &result.video_id);
            Output::kv("Duration", &crate::transcription::format_timestamp(result.duration));
        }
        Err(e) => {
            Output::error(&format!("Failed to process: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Transcribe and chunk, writing the transcript JSON instead of indexing.
async fn run_transcribe_only(
    audio: &Path,
    video_id: &str,
    title: &str,
    output_path: &Path,
    settings: Settings,
) -> Result<()> {
    // The snapshot is not touched, so start from an empty engine.
    let engine = SearchEngine::new(create_embedder(&settings.embedding)?);
    let orchestrator = Orchestrator::new(&settings, engine.into())?;

    let spinner = Output::spinner("Transcribing...");
    let video = orchestrator.transcribe_media(audio, video_id, title).await;
    spinner.finish_and_clear();
    let video = video?;

    let json = serde_json::to_string_pretty(&video)?;
    std::fs::write(output_path, json)?;

    Output::success(&format!(
        "Wrote {} chunks to {}",
        video.chunks.len(),
        output_path.display()
    ));
    Output::info(&format!("Index it later with 'vidsearch index {}'", output_path.display()));
    Ok(())
}

/// Use the file name without extension as the title.
fn default_title(audio: &Path) -> String {
    audio
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| audio.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title() {
        assert_eq!(default_title(Path::new("/media/intro-to-ml.mp3")), "intro-to-ml");
        assert_eq!(default_title(Path::new("talk")), "talk");
    }
}
