//! Pre-flight checks before expensive operations.
//!
//! Validates that required API keys are present before starting
//! operations that would otherwise fail midway.

use crate::error::{GranskeError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Full research requires both LLM and search API keys.
    Research,
    /// Web search requires the search API key.
    Search,
    /// Scraping talks to the target site directly.
    Scrape,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Research => {
            check_env_key("OPENAI_API_KEY", "sk-...")?;
            check_env_key("TAVILY_API_KEY", "tvly-...")?;
        }
        Operation::Search => {
            check_env_key("TAVILY_API_KEY", "tvly-...")?;
        }
        Operation::Scrape => {
            // No API keys needed for scraping
        }
    }
    Ok(())
}

/// Check that an API key environment variable is set and non-empty.
fn check_env_key(name: &str, example: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(GranskeError::Config(format!(
            "{} is empty. Set it with: export {}='{}'",
            name, name, example
        ))),
        Err(_) => Err(GranskeError::Config(format!(
            "{} not set. Set it with: export {}='{}'",
            name, name, example
        ))),
    }
}
