//! Stats command implementation.

use super::open_engine;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the stats command.
pub fn run_stats(settings: Settings) -> Result<()> {
    let engine = open_engine(&settings)?;
    let stats = engine.stats();

    Output::header("Index Statistics");
    Output::kv("Videos", &stats.total_videos.to_string());
    Output::kv("Chunks", &stats.total_chunks.to_string());
    Output::kv("Embedding dimension", &stats.embedding_dimension.to_string());
    Output::kv("Model", engine.embedder().model_id());
    Output::kv("Snapshot", &settings.snapshot_path().display().to_string());

    Ok(())
}
