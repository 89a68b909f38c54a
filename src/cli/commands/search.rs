//! Search command implementation.

use super::open_engine;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::engine::SearchQuery;
use crate::error::VidsearchError;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, top_k: Option<i64>, json: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Embed, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let engine = open_engine(&settings)?;
    let request = SearchQuery {
        query: query.to_string(),
        top_k: Some(top_k.unwrap_or(settings.search.default_top_k)),
    };

    let spinner = Output::spinner("Searching...");
    let response = engine.execute(&request).await;
    spinner.finish_and_clear();

    let response = match response {
        Ok(response) => response,
        Err(VidsearchError::EmptyQuery) => {
            Output::error("Query cannot be empty.");
            return Err(VidsearchError::EmptyQuery.into());
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.results.is_empty() {
        Output::warning("No results found. Use 'vidsearch index <files>' to add content.");
    } else {
        Output::success(&format!(
            "Found {} results in {:.1} ms",
            response.results.len(),
            response.processing_time_ms
        ));

        for (rank, result) in response.results.iter().enumerate() {
            Output::search_result(rank + 1, result);
        }
    }

    Ok(())
}
