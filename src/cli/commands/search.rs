//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::search::{SearchProvider, TavilySearch};
use anyhow::Result;

/// Run the search command.
pub async fn run_search(queries: &[String], limit: usize, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granske doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut search_settings = settings.search.clone();
    search_settings.max_results = limit;
    let provider = TavilySearch::new(search_settings);

    let spinner = Output::spinner("Searching...");

    let results = provider.search(queries).await;
    spinner.finish_and_clear();

    match results {
        Ok(hits) => {
            if hits.is_empty() {
                Output::warning("No results found for your queries.");
            } else {
                Output::success(&format!("Found {} results", hits.len()));

                for hit in &hits {
                    Output::search_result(&hit.title, &hit.url, hit.score, &hit.content, &hit.query);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
