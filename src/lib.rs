//! vidsearch - Semantic search over video transcripts
//!
//! Index spoken-word video transcripts and answer natural-language questions
//! with the exact video moments that address them.
//!
//! # Overview
//!
//! vidsearch allows you to:
//! - Transcribe audio into time-coded segments
//! - Group segments into duration-bounded chunks
//! - Embed chunks and store them in an exact nearest-neighbour index
//! - Search the index and get timestamped, ranked results
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcription` - Speech-to-text transcription
//! - `chunking` - Temporal chunking of transcript segments
//! - `embedding` - Embedding generation
//! - `vector_store` - Flat L2 index and SQLite snapshots
//! - `engine` - Video catalog, indexing and search
//! - `orchestrator` - Ingestion pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidsearch::chunking::TranscriptChunk;
//! use vidsearch::embedding::HashingEmbedder;
//! use vidsearch::engine::{SearchEngine, VideoTranscript};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut engine = SearchEngine::new(Arc::new(HashingEmbedder::new(384)?));
//!
//!     engine
//!         .index_video(VideoTranscript {
//!             video_id: "aws_101".to_string(),
//!             title: "AWS Basics".to_string(),
//!             duration: 30.0,
//!             chunks: vec![TranscriptChunk::new("chunk_0", "AWS Lambda runs code on demand", 0.0, 30.0)],
//!             created_at: None,
//!         })
//!         .await?;
//!
//!     for result in engine.search("What is AWS Lambda?", 5).await? {
//!         println!("{} @ {}", result.video_title, result.format_timestamp());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod transcription;
pub mod vector_store;

pub use error::{Result, VidsearchError};
