//! Configuration module for vidsearch.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, SearchSettings, Settings,
    TranscriptionSettings,
};
