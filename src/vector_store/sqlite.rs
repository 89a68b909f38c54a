//! SQLite snapshot storage for the vector index and video catalog.
//!
//! A snapshot holds the vector blobs, their metadata entries and the catalog.
//! The vectors and entries are only meaningful as a pair, so they are always
//! written in the same transaction and checked against each other on read.
//!
//! The `kind` meta key tells an index-only snapshot (written by
//! [`FlatL2Index::snapshot`]) apart from an engine snapshot that also
//! carries the catalog.

use super::{FlatL2Index, IndexedEntry, VectorIndex};
use crate::engine::VideoTranscript;
use crate::error::{Result, VidsearchError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Contents of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Vectors and entries only.
    Index,
    /// Vectors, entries and the video catalog.
    Engine,
}

impl SnapshotKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Engine => "engine",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "index" => Ok(Self::Index),
            "engine" => Ok(Self::Engine),
            other => Err(VidsearchError::Snapshot(format!(
                "unknown snapshot kind: {}",
                other
            ))),
        }
    }
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS vectors (
        position INTEGER PRIMARY KEY,
        embedding BLOB NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        position INTEGER PRIMARY KEY,
        video_id TEXT NOT NULL,
        video_title TEXT NOT NULL,
        chunk_id TEXT NOT NULL,
        start_time REAL NOT NULL,
        end_time REAL NOT NULL,
        text TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS videos (
        video_id TEXT PRIMARY KEY,
        video_title TEXT NOT NULL,
        transcript_json TEXT NOT NULL
    );
"#;

/// SQLite-backed snapshot file.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) a snapshot file.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        debug!("Opened snapshot store at {:?}", path);
        Ok(Self { conn })
    }

    /// Open a snapshot file that must already exist.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VidsearchError::Snapshot(format!(
                "snapshot not found: {}",
                path.display()
            )));
        }
        Self::open(path)
    }

    /// Create an in-memory snapshot store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Serialize an embedding to little-endian bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding from little-endian bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Replace the stored index with `index`, dropping any stored catalog.
    pub fn write_index(&mut self, index: &FlatL2Index) -> Result<()> {
        let tx = self.conn.transaction()?;
        Self::write_index_rows(&tx, index, SnapshotKind::Index)?;
        tx.execute("DELETE FROM videos", [])?;
        tx.commit()?;
        Ok(())
    }

    /// Replace the stored index and catalog in one transaction.
    #[instrument(skip_all, fields(vectors = index.len()))]
    pub fn write_snapshot<'a, I>(&mut self, index: &FlatL2Index, videos: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a VideoTranscript>,
    {
        let tx = self.conn.transaction()?;
        Self::write_index_rows(&tx, index, SnapshotKind::Engine)?;

        tx.execute("DELETE FROM videos", [])?;
        let mut count = 0;
        for video in videos {
            let transcript_json = serde_json::to_string(video)?;
            tx.execute(
                "INSERT INTO videos (video_id, video_title, transcript_json) VALUES (?1, ?2, ?3)",
                params![video.video_id, video.title, transcript_json],
            )?;
            count += 1;
        }

        tx.commit()?;
        info!("Wrote snapshot: {} vectors, {} videos", index.len(), count);
        Ok(())
    }

    fn write_index_rows(conn: &Connection, index: &FlatL2Index, kind: SnapshotKind) -> Result<()> {
        conn.execute("DELETE FROM vectors", [])?;
        conn.execute("DELETE FROM entries", [])?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('dimension', ?1)",
            params![index.dimension().to_string()],
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('written_at', ?1)",
            params![Utc::now().to_rfc3339()],
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('kind', ?1)",
            params![kind.as_str()],
        )?;

        let mut insert_vector =
            conn.prepare("INSERT INTO vectors (position, embedding) VALUES (?1, ?2)")?;
        let mut insert_entry = conn.prepare(
            r#"
            INSERT INTO entries
            (position, video_id, video_title, chunk_id, start_time, end_time, text)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        for (position, (vector, entry)) in index.iter().enumerate() {
            let position = position as i64;
            insert_vector.execute(params![position, Self::embedding_to_bytes(vector)])?;
            insert_entry.execute(params![
                position,
                entry.video_id,
                entry.video_title,
                entry.chunk_id,
                entry.start_time,
                entry.end_time,
                entry.text,
            ])?;
        }

        Ok(())
    }

    /// What the file holds, or `None` if nothing was ever written.
    pub fn kind(&self) -> Result<Option<SnapshotKind>> {
        let kind: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'kind'", [], |row| row.get(0))
            .optional()?;
        kind.as_deref().map(SnapshotKind::parse).transpose()
    }

    /// Read the stored index, or `None` if no index was ever written.
    pub fn read_index(&self) -> Result<Option<FlatL2Index>> {
        let dimension: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'dimension'", [], |row| row.get(0))
            .optional()?;

        let Some(dimension) = dimension else {
            return Ok(None);
        };
        let dimension: usize = dimension
            .parse()
            .map_err(|e| VidsearchError::Snapshot(format!("invalid stored dimension: {}", e)))?;

        let mut stmt = self
            .conn
            .prepare("SELECT embedding FROM vectors ORDER BY position")?;
        let blobs = stmt
            .query_map([], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut data = Vec::with_capacity(blobs.len() * dimension);
        for blob in &blobs {
            let vector = Self::bytes_to_embedding(blob);
            if vector.len() != dimension || blob.len() % 4 != 0 {
                return Err(VidsearchError::DimensionMismatch {
                    expected: dimension,
                    actual: blob.len() / 4,
                });
            }
            data.extend(vector);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT video_id, video_title, chunk_id, start_time, end_time, text
            FROM entries
            ORDER BY position
            "#,
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(IndexedEntry {
                    video_id: row.get(0)?,
                    video_title: row.get(1)?,
                    chunk_id: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    text: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if blobs.len() != entries.len() {
            return Err(VidsearchError::CountMismatch {
                vectors: blobs.len(),
                entries: entries.len(),
            });
        }

        FlatL2Index::from_parts(dimension, data, entries).map(Some)
    }

    /// Read the stored video catalog, ordered by video id.
    pub fn read_catalog(&self) -> Result<Vec<VideoTranscript>> {
        let mut stmt = self
            .conn
            .prepare("SELECT transcript_json FROM videos ORDER BY video_id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(VidsearchError::from))
            .collect()
    }
}
