//! Index command implementation.

use super::{open_engine, save_engine};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::engine::VideoTranscript;
use crate::error::VidsearchError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read the videos stored in a transcript file, in file order.
///
/// A file holds either one video object or an array of them.
pub(crate) fn load_transcripts(path: &Path) -> crate::error::Result<Vec<VideoTranscript>> {
    let content = std::fs::read_to_string(path)?;

    let parsed = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<VideoTranscript>>(&content)
    } else {
        serde_json::from_str::<VideoTranscript>(&content).map(|video| vec![video])
    };

    parsed.map_err(|e| {
        VidsearchError::InvalidInput(format!("{}: not a transcript file: {}", path.display(), e))
    })
}

/// Run the index command.
pub async fn run_index(files: &[PathBuf], replace: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Embed, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut videos = Vec::new();
    for file in files {
        let loaded = load_transcripts(file).with_context(|| format!("Failed to read {}", file.display()))?;
        info!("Loaded {} videos from {}", loaded.len(), file.display());
        videos.extend(loaded);
    }

    if videos.is_empty() {
        Output::warning("No videos found in the given files.");
        return Ok(());
    }

    let replace = replace || settings.search.replace_on_reindex;
    let mut engine = open_engine(&settings)?;

    let pb = Output::progress_bar(videos.len() as u64, "Indexing");
    let mut indexed_videos = 0;
    let mut indexed_chunks = 0;
    let mut failure = None;

    for video in videos {
        pb.set_message(video.video_id.clone());
        let video_id = video.video_id.clone();

        let result = if replace {
            engine.reindex_video(video).await
        } else {
            engine.index_video(video).await
        };

        match result {
            Ok(chunks) => {
                indexed_videos += 1;
                indexed_chunks += chunks;
                pb.inc(1);
            }
            Err(e) => {
                failure = Some((video_id, e));
                break;
            }
        }
    }
    pb.finish_and_clear();

    // Videos indexed before a failure stay indexed.
    if indexed_videos > 0 {
        save_engine(&engine, &settings)?;
    }

    if let Some((video_id, e)) = failure {
        Output::error(&format!("Failed to index '{}': {}", video_id, e));
        if indexed_videos > 0 {
            Output::info(&format!("{} videos indexed before the failure were saved.", indexed_videos));
        }
        return Err(e.into());
    }

    Output::success(&format!(
        "Indexed {} videos ({} chunks)",
        indexed_videos, indexed_chunks
    ));
    let stats = engine.stats();
    Output::kv("Total videos", &stats.total_videos.to_string());
    Output::kv("Total chunks", &stats.total_chunks.to_string());

    Ok(())
}
