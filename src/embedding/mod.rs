//! Embedding generation for semantic search.
//!
//! An embedder maps text to fixed-dimension vectors. The dimension is fixed
//! when the embedder is constructed and never changes afterwards. Backends
//! split large inputs into batches internally; batching never changes the
//! output, which is always one vector per input, in input order.

#[cfg(feature = "local-embeddings")]
mod local;
mod hashing;
mod openai;

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedder;
pub use hashing::HashingEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::EmbeddingSettings;
use crate::error::{Result, VidsearchError};
use async_trait::async_trait;
use std::sync::Arc;

/// Default number of texts sent to a model per call.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| VidsearchError::Embedding("Empty embedding response".to_string()))
    }

    /// Generate embeddings for multiple texts, one row per input.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;

    /// Identifier of the backing model.
    fn model_id(&self) -> &str;
}

/// Verify that a backend returned one vector of the right size per input.
pub(crate) fn check_embeddings(inputs: usize, embeddings: &[Vec<f32>], dimensions: usize) -> Result<()> {
    if embeddings.len() != inputs {
        return Err(VidsearchError::Embedding(format!(
            "expected {} embeddings, got {}",
            inputs,
            embeddings.len()
        )));
    }
    if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
        return Err(VidsearchError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        });
    }
    Ok(())
}

/// Build the embedder named by the settings.
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    let batch_size = if settings.batch_size == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        settings.batch_size
    };

    match settings.provider.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAIEmbedder::with_config(
            &settings.model,
            settings.dimensions as usize,
            batch_size,
        )?)),
        "hashing" => Ok(Arc::new(HashingEmbedder::with_config(
            settings.dimensions as usize,
            batch_size,
        )?)),
        #[cfg(feature = "local-embeddings")]
        "fastembed" | "local" => Ok(Arc::new(FastEmbedder::with_config(&settings.model, batch_size)?)),
        #[cfg(not(feature = "local-embeddings"))]
        "fastembed" | "local" => Err(VidsearchError::ModelLoad(
            "local embeddings require building with the `local-embeddings` feature".to_string(),
        )),
        other => Err(VidsearchError::ModelLoad(format!(
            "Unknown embedding provider: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hashing_embedder() {
        let settings = EmbeddingSettings {
            provider: "hashing".to_string(),
            model: String::new(),
            dimensions: 128,
            batch_size: 0,
        };

        let embedder = tokio_test::assert_ok!(create_embedder(&settings));
        assert_eq!(embedder.dimensions(), 128);
    }

    #[test]
    fn test_unknown_provider_fails_to_load() {
        let settings = EmbeddingSettings {
            provider: "word2vec".to_string(),
            ..EmbeddingSettings::default()
        };

        assert!(matches!(create_embedder(&settings), Err(VidsearchError::ModelLoad(_))));
    }

    #[test]
    fn test_check_embeddings() {
        assert!(check_embeddings(2, &[vec![0.0; 3], vec![0.0; 3]], 3).is_ok());
        assert!(matches!(
            check_embeddings(2, &[vec![0.0; 3]], 3),
            Err(VidsearchError::Embedding(_))
        ));
        assert!(matches!(
            check_embeddings(1, &[vec![0.0; 4]], 3),
            Err(VidsearchError::DimensionMismatch { expected: 3, actual: 4 })
        ));
    }
}
