//! Feature-hashing embedder.
//!
//! Maps lowercase word tokens into a fixed number of signed buckets and
//! L2-normalizes the result. It needs no model download or network access and
//! is fully deterministic, which makes it usable offline and in tests. Texts
//! sharing more words land closer together.

use super::{check_embeddings, Embedder, DEFAULT_BATCH_SIZE};
use crate::error::{Result, VidsearchError};
use async_trait::async_trait;
use tracing::debug;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic bag-of-words embedder.
pub struct HashingEmbedder {
    dimensions: usize,
    batch_size: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        Self::with_config(dimensions, DEFAULT_BATCH_SIZE)
    }

    pub fn with_config(dimensions: usize, batch_size: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(VidsearchError::ModelLoad(
                "hashing embedder needs at least one dimension".to_string(),
            ));
        }

        Ok(Self {
            dimensions,
            batch_size: batch_size.max(1),
            model_id: format!("hashing-{}", dimensions),
        })
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            embeddings.extend(batch.iter().map(|text| self.embed_text(text)));
        }

        check_embeddings(texts.len(), &embeddings, self.dimensions)?;
        debug!("Hashed {} texts", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}
