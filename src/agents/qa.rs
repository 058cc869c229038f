//! LLM-based question answering over scraped pages.

use super::Answerer;
use crate::config::{ChatSettings, Prompts};
use crate::error::{GranskeError, Result};
use crate::openai::create_client;
use crate::scrape::ScrapedPage;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Agent that composes an answer from scraped source pages.
pub struct QaAgent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: ChatSettings,
    prompts: Prompts,
}

impl QaAgent {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            client: create_client(settings.base_url.as_deref()),
            settings,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Format scraped pages as numbered source blocks for the prompt.
    fn format_context(pages: &[ScrapedPage]) -> String {
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let mut block = format!(
                    "---\n[{}] {}\nURL: {}",
                    i + 1,
                    page.display_title(),
                    page.url
                );
                if let Some(description) = &page.description {
                    block.push_str(&format!("\nDescription: {}", description));
                }
                block.push_str(&format!("\n\n{}\n---", page.content));
                block
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl Answerer for QaAgent {
    #[instrument(skip(self, pages), fields(question = %question, sources = pages.len()))]
    async fn answer(&self, question: &str, pages: &[ScrapedPage]) -> Result<String> {
        info!("Answering from {} scraped sources", pages.len());

        let context_text = Self::format_context(pages);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.qa.system, &vars);
        let user_message = self.prompts.render_with_custom(&self.prompts.qa.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| GranskeError::Qa(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| GranskeError::Qa(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .build()
            .map_err(|e| GranskeError::Qa(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GranskeError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GranskeError::Qa("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated answer of {} chars", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: Option<&str>, content: &str) -> ScrapedPage {
        ScrapedPage {
            url: url.to_string(),
            title: title.map(|t| t.to_string()),
            description: None,
            domain: None,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_format_context_numbers_sources() {
        let pages = vec![
            page("https://a.example/one", Some("First"), "alpha"),
            page("https://b.example/two", Some("Second"), "beta"),
        ];

        let context = QaAgent::format_context(&pages);
        assert!(context.contains("[1] First"));
        assert!(context.contains("[2] Second"));
        assert!(context.contains("URL: https://a.example/one"));
        assert!(context.contains("alpha"));
    }

    #[test]
    fn test_format_context_includes_description() {
        let mut p = page("https://a.example", Some("Titled"), "body");
        p.description = Some("A summary.".to_string());

        let context = QaAgent::format_context(&[p]);
        assert!(context.contains("Description: A summary."));
    }

    #[test]
    fn test_format_context_empty() {
        assert_eq!(QaAgent::format_context(&[]), "");
    }
}
