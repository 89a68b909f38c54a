//! Clear command implementation.

use super::{open_engine, save_engine};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::Term;

/// Run the clear command.
pub fn run_clear(yes: bool, settings: Settings) -> Result<()> {
    let mut engine = open_engine(&settings)?;
    let stats = engine.stats();

    if stats.total_videos == 0 && stats.total_chunks == 0 {
        Output::info("Index is already empty.");
        return Ok(());
    }

    if !yes && !confirm(&format!(
        "Remove {} videos ({} chunks)? [y/N] ",
        stats.total_videos, stats.total_chunks
    ))? {
        Output::info("Aborted.");
        return Ok(());
    }

    engine.clear_index();
    save_engine(&engine, &settings)?;
    Output::success("Index cleared.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(prompt)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
