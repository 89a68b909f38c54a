//! Remove command implementation.

use super::{open_engine, save_engine};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the remove command.
pub fn run_remove(video_id: &str, settings: Settings) -> Result<()> {
    let mut engine = open_engine(&settings)?;

    let known = engine.get_video(video_id).is_some();
    let removed = engine.remove_video(video_id);

    if !known && removed == 0 {
        Output::warning(&format!("No indexed video with id '{}'", video_id));
        return Ok(());
    }

    save_engine(&engine, &settings)?;
    Output::success(&format!("Removed '{}' ({} chunks)", video_id, removed));
    Ok(())
}
