//! LLM agents for the research pipeline.
//!
//! Two chat-completion agents: one turns a research instruction into web
//! search queries, the other answers the question from scraped pages.

mod qa;
mod query;

pub use qa::QaAgent;
pub use query::QueryAgent;

use crate::error::Result;
use crate::scrape::ScrapedPage;
use async_trait::async_trait;

/// Trait for search query generation.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    /// Turn a research instruction into `num_queries` web search queries.
    async fn generate(&self, instruction: &str, num_queries: usize) -> Result<Vec<String>>;
}

/// Trait for answering a question from scraped source pages.
#[async_trait]
pub trait Answerer: Send + Sync {
    /// Produce an answer to `question` grounded in `pages`.
    async fn answer(&self, question: &str, pages: &[ScrapedPage]) -> Result<String>;
}
