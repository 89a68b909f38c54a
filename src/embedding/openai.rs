//! OpenAI embeddings implementation.

use super::{check_embeddings, Embedder};
use crate::error::{Result, VidsearchError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with custom model, dimensions and batch size.
    pub fn with_config(model: &str, dimensions: usize, batch_size: usize) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(VidsearchError::ModelLoad("embedding model name is empty".to_string()));
        }
        if dimensions == 0 {
            return Err(VidsearchError::ModelLoad(format!(
                "model {} configured with zero dimensions",
                model
            )));
        }

        let client = create_client().map_err(|e| VidsearchError::ModelLoad(e.to_string()))?;

        Ok(Self {
            client,
            model: model.to_string(),
            dimensions,
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| VidsearchError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| VidsearchError::OpenAI(format!("Embedding API error: {}", e)))?;

            // Sort by index to keep input order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            let batch: Vec<Vec<f32>> = embeddings.into_iter().map(|e| e.embedding).collect();
            check_embeddings(chunk.len(), &batch, self.dimensions)?;
            all_embeddings.extend(batch);
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
