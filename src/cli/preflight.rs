//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, VidsearchError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Transcription always calls the OpenAI API.
    Transcribe,
    /// Indexing and search need the API only with the OpenAI embedder.
    Embed,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Transcribe => {
            check_api_key()?;
        }
        Operation::Embed => {
            if uses_openai_embeddings(settings) {
                check_api_key()?;
            }
        }
    }
    Ok(())
}

fn uses_openai_embeddings(settings: &Settings) -> bool {
    settings.embedding.provider.eq_ignore_ascii_case("openai")
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(VidsearchError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(VidsearchError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_embedder_has_no_requirements() {
        let mut settings = Settings::default();
        settings.embedding.provider = "hashing".to_string();
        assert!(check(Operation::Embed, &settings).is_ok());
    }
}
