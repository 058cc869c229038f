//! Error types for Granske.

use thiserror::Error;

/// Library-level error type for Granske operations.
#[derive(Error, Debug)]
pub enum GranskeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query generation failed: {0}")]
    QueryAgent(String),

    #[error("Web search failed: {0}")]
    Search(String),

    #[error("Page scrape failed for {url}: {reason}")]
    Scrape { url: String, reason: String },

    #[error("Answer generation failed: {0}")]
    Qa(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GranskeError {
    /// Build a scrape error for a URL.
    pub fn scrape(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Scrape {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Granske operations.
pub type Result<T> = std::result::Result<T, GranskeError>;
