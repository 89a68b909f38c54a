//! Local sentence-transformers embeddings via fastembed (ONNX runtime).

use super::{check_embeddings, Embedder};
use crate::error::{Result, VidsearchError};
use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// FastEmbed provider, all-MiniLM-L6-v2 by default.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
    model_id: String,
    dimensions: usize,
    batch_size: usize,
}

impl FastEmbedder {
    /// Load a model by name. Fails with `ModelLoad` if it cannot be loaded.
    pub fn with_config(model_name: &str, batch_size: usize) -> Result<Self> {
        let model = parse_model(model_name)?;
        let dimensions = TextEmbedding::get_model_info(&model)
            .map_err(|e| VidsearchError::ModelLoad(e.to_string()))?
            .dim;

        info!("Loading embedding model: {}", model);
        let embedding = TextEmbedding::try_new(InitOptions::new(model.clone()))
            .map_err(|e| VidsearchError::ModelLoad(format!("{}: {}", model, e)))?;
        info!("Model loaded. Embedding dimension: {}", dimensions);

        Ok(Self {
            model: Mutex::new(embedding),
            model_id: model.to_string(),
            dimensions,
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut model = self
            .model
            .lock()
            .map_err(|e| VidsearchError::Embedding(format!("Failed to acquire model: {}", e)))?;

        let embeddings = model
            .embed(texts, Some(self.batch_size))
            .map_err(|e| VidsearchError::Embedding(e.to_string()))?;

        check_embeddings(texts.len(), &embeddings, self.dimensions)?;
        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn parse_model(name: &str) -> Result<EmbeddingModel> {
    match name.trim().to_lowercase().as_str() {
        "" | "minilm" | "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        other => Err(VidsearchError::ModelLoad(format!(
            "Unsupported local embedding model: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        assert!(matches!(parse_model("all-MiniLM-L6-v2"), Ok(EmbeddingModel::AllMiniLML6V2)));
        assert!(matches!(parse_model("unknown-model"), Err(VidsearchError::ModelLoad(_))));
    }
}
