//! Scrape command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::scrape::{PageScraper, WebpageScraper};
use anyhow::Result;

/// Run the scrape command.
pub async fn run_scrape(url: &str, raw: bool, settings: Settings) -> Result<()> {
    let scraper = WebpageScraper::new(settings.scraper.clone());

    let spinner = Output::spinner("Scraping...");

    let result = scraper.scrape(url).await;
    spinner.finish_and_clear();

    match result {
        Ok(page) => {
            if raw {
                println!("{}", page.content);
            } else {
                Output::header(page.display_title());
                if let Some(domain) = &page.domain {
                    Output::kv("Domain", domain);
                }
                if let Some(description) = &page.description {
                    Output::kv("Description", description);
                }
                Output::kv("Length", &format!("{} chars", page.content.len()));
                println!("\n{}", page.content);
            }
        }
        Err(e) => {
            Output::error(&format!("Scrape failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
