//! Webpage scraping for the research pipeline.
//!
//! Fetches a result URL and reduces it to plain text plus light metadata,
//! ready to be handed to the answer step as context.

mod webpage;

pub use webpage::WebpageScraper;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A scraped page: extracted text plus light metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPage {
    /// The URL that was fetched.
    pub url: String,
    /// Page title, when the document had one.
    pub title: Option<String>,
    /// Meta description, when present.
    pub description: Option<String>,
    /// Host part of the URL.
    pub domain: Option<String>,
    /// Extracted plain text.
    pub content: String,
}

impl ScrapedPage {
    /// Title to show for this page, falling back to the domain or URL.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.domain.as_deref())
            .unwrap_or(&self.url)
    }
}

/// Trait for page scrapers.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetch a URL and extract its text content.
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_fallbacks() {
        let mut page = ScrapedPage {
            url: "https://example.com/post".to_string(),
            title: Some("A Post".to_string()),
            description: None,
            domain: Some("example.com".to_string()),
            content: String::new(),
        };
        assert_eq!(page.display_title(), "A Post");

        page.title = None;
        assert_eq!(page.display_title(), "example.com");

        page.domain = None;
        assert_eq!(page.display_title(), "https://example.com/post");
    }
}
