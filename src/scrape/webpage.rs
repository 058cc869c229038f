//! HTTP webpage scraper implementation.

use super::{PageScraper, ScrapedPage};
use crate::config::ScraperSettings;
use crate::error::{GranskeError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Rendering width for the text conversion.
const TEXT_WIDTH: usize = 80;

/// Scraper that fetches pages over HTTP and converts HTML to plain text.
pub struct WebpageScraper {
    client: reqwest::Client,
    settings: ScraperSettings,
    title_regex: Regex,
    description_regex: Regex,
}

impl WebpageScraper {
    /// Create a new scraper from settings.
    pub fn new(settings: ScraperSettings) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        let title_regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("Invalid regex");
        // Matches both attribute orders: name before content and content before name.
        let description_regex = Regex::new(
            r#"(?is)<meta\s+(?:name\s*=\s*["']description["'][^>]*content\s*=\s*["']([^"']*)["']|content\s*=\s*["']([^"']*)["'][^>]*name\s*=\s*["']description["'])"#,
        )
        .expect("Invalid regex");

        Self {
            client,
            settings,
            title_regex,
            description_regex,
        }
    }

    /// Extract title and meta description from raw HTML.
    fn extract_metadata(&self, html: &str) -> (Option<String>, Option<String>) {
        let title = self
            .title_regex
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| collapse_whitespace(m.as_str()))
            .filter(|t| !t.is_empty());

        let description = self
            .description_regex
            .captures(html)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| collapse_whitespace(m.as_str()))
            .filter(|d| !d.is_empty());

        (title, description)
    }

    /// Convert a response body to plain text based on its content type.
    fn body_to_text(&self, content_type: &str, body: &[u8]) -> String {
        if content_type.contains("html") {
            html2text::from_read(body, TEXT_WIDTH)
                .unwrap_or_else(|_| String::from_utf8_lossy(body).to_string())
        } else {
            String::from_utf8_lossy(body).to_string()
        }
    }
}

#[async_trait]
impl PageScraper for WebpageScraper {
    #[instrument(skip(self))]
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let parsed = Url::parse(url)
            .map_err(|e| GranskeError::scrape(url, format!("invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GranskeError::scrape(
                url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        let domain = parsed.host_str().map(|h| h.to_string());

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| GranskeError::scrape(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GranskeError::scrape(url, format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| GranskeError::scrape(url, e.to_string()))?;

        if body.len() > self.settings.max_content_length {
            return Err(GranskeError::scrape(
                url,
                format!(
                    "content length {} exceeds limit {}",
                    body.len(),
                    self.settings.max_content_length
                ),
            ));
        }

        let (title, description) = if content_type.contains("html") {
            self.extract_metadata(&String::from_utf8_lossy(&body))
        } else {
            (None, None)
        };

        let content = self.body_to_text(&content_type, &body);
        debug!(
            url,
            bytes = body.len(),
            chars = content.len(),
            "Scraped page"
        );

        Ok(ScrapedPage {
            url: url.to_string(),
            title,
            description,
            domain,
            content,
        })
    }
}

/// Collapse runs of whitespace into single spaces and trim.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
