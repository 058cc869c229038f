//! Tavily search API client.

use super::{merge_hits, SearchHit, SearchProvider};
use crate::config::SearchSettings;
use crate::error::{GranskeError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";
const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Default timeout for search requests.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Tavily-backed search provider.
pub struct TavilySearch {
    client: reqwest::Client,
    settings: SearchSettings,
}

impl TavilySearch {
    /// Create a new Tavily search provider.
    pub fn new(settings: SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, settings }
    }

    /// Read the API key from the environment.
    fn api_key() -> Result<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(GranskeError::Config(format!(
                "{} not set. Get a key at https://tavily.com and export it.",
                API_KEY_ENV
            ))),
        }
    }

    /// Run a single query against the API.
    async fn search_one(&self, api_key: &str, query: &str) -> Result<Vec<SearchHit>> {
        let body = json!({
            "query": query,
            "max_results": self.settings.max_results,
            "search_depth": self.settings.search_depth,
            "include_answer": self.settings.include_answer,
        });

        let response = self
            .client
            .post(TAVILY_API_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(500).collect();
            return Err(GranskeError::Search(format!(
                "Tavily returned {}: {}",
                status, snippet
            )));
        }

        let parsed: TavilyResponse = response.json().await?;
        Ok(parsed.into_hits(query))
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    #[instrument(skip(self), fields(queries = queries.len()))]
    async fn search(&self, queries: &[String]) -> Result<Vec<SearchHit>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = Self::api_key()?;

        // One request per query, in flight together.
        let requests = queries.iter().map(|q| self.search_one(&api_key, q));
        let lists = futures::future::try_join_all(requests).await?;

        let hits = merge_hits(lists, self.settings.max_results);
        debug!("Merged {} hits across {} queries", hits.len(), queries.len());
        Ok(hits)
    }
}

/// Wire format of a Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

impl TavilyResponse {
    /// Convert wire results into hits, tagging each with its source query.
    fn into_hits(self, query: &str) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
                query: query.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let raw = r#"{
            "query": "photonic qubits",
            "answer": "Summary.",
            "results": [
                {"title": "Paper", "url": "https://arxiv.example/1", "content": "text", "score": 0.97},
                {"title": "Blog", "url": "https://blog.example/p", "content": "more", "score": 0.42}
            ]
        }"#;

        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        let hits = parsed.into_hits("photonic qubits");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://arxiv.example/1");
        assert_eq!(hits[0].score, 0.97);
        assert_eq!(hits[0].query, "photonic qubits");
    }

    #[test]
    fn test_parse_drops_urlless_results() {
        let raw = r#"{"results": [{"title": "No link", "content": "x", "score": 0.5}]}"#;
        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.into_hits("q").is_empty());
    }

    #[test]
    fn test_parse_missing_results_field() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_hits("q").is_empty());
    }
}
