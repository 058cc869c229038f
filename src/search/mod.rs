//! Web search for the research pipeline.
//!
//! Fans a set of generated queries out to a hosted search API and merges the
//! per-query result lists into one ranked, URL-deduplicated list.

mod tavily;

pub use tavily::TavilySearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Snippet or extracted content from the result.
    pub content: String,
    /// Provider relevance score (higher is better).
    pub score: f64,
    /// The query that produced this hit.
    pub query: String,
}

/// Trait for web-search providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run all queries and return merged hits, ranked by score.
    async fn search(&self, queries: &[String]) -> Result<Vec<SearchHit>>;
}

/// Merge per-query result lists into one ranked list.
///
/// Duplicate URLs keep their first occurrence, results are sorted by score
/// descending, and the list is capped at `max_results`.
pub fn merge_hits(lists: Vec<Vec<SearchHit>>, max_results: usize) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    let mut merged: Vec<SearchHit> = Vec::new();

    for hits in lists {
        for hit in hits {
            if seen.insert(hit.url.clone()) {
                merged.push(hit);
            }
        }
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(max_results);
    merged
}
