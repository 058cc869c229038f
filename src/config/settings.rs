//! Configuration settings for Granske.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub chat: ChatSettings,
    pub search: SearchSettings,
    pub scraper: ScraperSettings,
    pub research: ResearchSettings,
    pub prompts: PromptSettings,
}

/// Chat-completion settings shared by both agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Model for query generation and answering.
    pub model: String,
    /// Optional API base override for OpenAI-compatible providers.
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap per agent call.
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            temperature: 0.0,
            max_tokens: 1000,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum merged results returned by the search step.
    pub max_results: usize,
    /// Tavily search depth ("basic" or "advanced").
    pub search_depth: String,
    /// Ask Tavily to include its own summary answer per query.
    pub include_answer: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            search_depth: "basic".to_string(),
            include_answer: true,
        }
    }
}

/// Webpage scraper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    /// User-Agent header sent with scrape requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum response body size in bytes; larger pages are rejected.
    pub max_content_length: usize,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_seconds: 30,
            max_content_length: 1_000_000,
        }
    }
}

/// Research pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Search queries to generate when the caller does not say.
    pub num_queries: usize,
    /// Top-ranked search results to scrape and feed to the answer step.
    pub top_results: usize,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            num_queries: 3,
            top_results: 5,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides from a lookup function.
    ///
    /// `OPENAI_MODEL` and `OPENAI_BASE_URL` override the `[chat]` section.
    /// API keys are never stored in settings; the agents and search tool read
    /// them from the environment directly.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.is_empty()) {
            self.chat.model = model;
        }
        if let Some(base) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            self.chat.base_url = Some(base);
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::GranskeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("granske")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.chat.model, "gpt-4o-mini");
        assert_eq!(settings.chat.temperature, 0.0);
        assert_eq!(settings.chat.max_tokens, 1000);
        assert_eq!(settings.research.num_queries, 3);
        assert_eq!(settings.research.top_results, 5);
        assert_eq!(settings.search.max_results, 10);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [chat]
            model = "gpt-4.1"

            [research]
            top_results = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.chat.model, "gpt-4.1");
        assert_eq!(settings.chat.max_tokens, 1000);
        assert_eq!(settings.research.top_results, 3);
        assert_eq!(settings.research.num_queries, 3);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            "OPENAI_MODEL" => Some("gpt-4.1-mini".to_string()),
            "OPENAI_BASE_URL" => Some("http://localhost:8080/v1".to_string()),
            _ => None,
        });

        assert_eq!(settings.chat.model, "gpt-4.1-mini");
        assert_eq!(
            settings.chat.base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            "OPENAI_MODEL" => Some(String::new()),
            _ => None,
        });

        assert_eq!(settings.chat.model, "gpt-4o-mini");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.search.max_results = 7;
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.search.max_results, 7);
    }
}
