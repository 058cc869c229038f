//! OpenAI client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with configured timeout.
///
/// The API key comes from `OPENAI_API_KEY`; `base_url` overrides the API
/// endpoint for OpenAI-compatible providers.
pub fn create_client(base_url: Option<&str>) -> Client<OpenAIConfig> {
    create_client_with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    base_url: Option<&str>,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let config = match base_url {
        Some(base) => OpenAIConfig::default().with_api_base(base),
        None => OpenAIConfig::default(),
    };

    Client::with_config(config).with_http_client(http_client)
}
