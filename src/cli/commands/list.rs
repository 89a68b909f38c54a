//! List command implementation.

use super::open_engine;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let engine = open_engine(&settings)?;
    let videos: Vec<_> = engine.videos().collect();

    if videos.is_empty() {
        Output::info("No videos indexed yet. Use 'vidsearch index <files>' to add content.");
        return Ok(());
    }

    Output::header(&format!("Indexed Videos ({})", videos.len()));
    println!();

    for video in &videos {
        Output::video_info(&video.title, &video.video_id, video.chunks.len(), video.duration);
    }

    let stats = engine.stats();
    println!();
    Output::kv("Total videos", &stats.total_videos.to_string());
    Output::kv("Total chunks", &stats.total_chunks.to_string());

    Ok(())
}
