//! CLI module for vidsearch.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vidsearch - Semantic search over video transcripts
///
/// Index chunked transcripts, then ask natural-language questions and get
/// back the video moments that answer them.
#[derive(Parser, Debug)]
#[command(name = "vidsearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "VIDSEARCH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level for the `vidsearch` target; `-v` flags override `configured`.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index transcript JSON files (one video object or an array per file)
    Index {
        /// Transcript files to index, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Drop earlier chunks of the same video before indexing
        #[arg(short, long)]
        replace: bool,
    },

    /// Transcribe an audio file and index it
    Transcribe {
        /// Local audio file
        audio: PathBuf,

        /// Identifier for the video
        #[arg(long)]
        video_id: String,

        /// Video title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Write the chunked transcript to this file instead of indexing
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop earlier chunks of the same video before indexing
        #[arg(short, long)]
        replace: bool,
    },

    /// Search indexed transcripts
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        top_k: Option<i64>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show index statistics
    Stats,

    /// List indexed videos
    List,

    /// Remove a video and its chunks from the index
    Remove {
        /// Video ID to remove
        video_id: String,
    },

    /// Remove everything from the index
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
