//! CLI command implementations.
//!
//! Every command works against the snapshot at `general.snapshot_path`: it
//! is loaded when present, and written back after any mutation.

mod clear;
mod config;
mod index;
mod list;
mod remove;
mod search;
mod stats;
mod transcribe;

pub use clear::run_clear;
pub use config::run_config;
pub use index::run_index;
pub use list::run_list;
pub use remove::run_remove;
pub use search::run_search;
pub use stats::run_stats;
pub use transcribe::run_transcribe;

use crate::config::Settings;
use crate::embedding::create_embedder;
use crate::engine::SearchEngine;
use crate::error::Result;
use tracing::debug;

/// Build the configured engine and load the snapshot if one exists.
pub(crate) fn open_engine(settings: &Settings) -> Result<SearchEngine> {
    let embedder = create_embedder(&settings.embedding)?;
    let mut engine = SearchEngine::new(embedder);

    let path = settings.snapshot_path();
    if path.exists() {
        engine.load_snapshot(&path)?;
    } else {
        debug!("No snapshot at {}; starting empty", path.display());
    }

    Ok(engine)
}

/// Write the engine state back to the configured snapshot.
pub(crate) fn save_engine(engine: &SearchEngine, settings: &Settings) -> Result<()> {
    engine.save_snapshot(&settings.snapshot_path())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Offline settings with the snapshot inside `dir`.
    pub(crate) fn test_settings(dir: &tempfile::TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.general.data_dir = dir.path().display().to_string();
        settings.general.snapshot_path = dir.path().join("index.db").display().to_string();
        settings.embedding.provider = "hashing".to_string();
        settings.embedding.dimensions = 64;
        settings
    }

    #[test]
    fn test_open_engine_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let engine = tokio_test::assert_ok!(open_engine(&test_settings(&dir)));
        assert_eq!(engine.stats().total_chunks, 0);
        assert_eq!(engine.stats().embedding_dimension, 64);
    }

    #[tokio::test]
    async fn test_engine_state_survives_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(&dir);

        let mut engine = open_engine(&settings).unwrap();
        engine
            .index_video(crate::engine::tests::video("v1", &["first chunk", "second chunk"]))
            .await
            .unwrap();
        save_engine(&engine, &settings).unwrap();

        let reopened = open_engine(&settings).unwrap();
        assert_eq!(reopened.stats().total_videos, 1);
        assert_eq!(reopened.stats().total_chunks, 2);
    }

    #[test]
    fn test_open_engine_rejects_snapshot_from_other_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings(&dir);
        save_engine(&open_engine(&settings).unwrap(), &settings).unwrap();

        settings.embedding.dimensions = 32;
        assert!(open_engine(&settings).is_err());
    }
}
