//! LLM-based search query generation.

use super::QueryGenerator;
use crate::config::{ChatSettings, Prompts};
use crate::error::{GranskeError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Agent that expands a research instruction into web search queries.
pub struct QueryAgent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    settings: ChatSettings,
    prompts: Prompts,
}

impl QueryAgent {
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

    /// Parse the LLM response into query strings.
    ///
    /// Accepts a bare JSON array, a `{"queries": [...]}` object, or falls
    /// back to one query per line for models that ignore the format.
    fn parse_queries(response: &str, num_queries: usize) -> Result<Vec<String>> {
        let mut queries = Self::parse_json_queries(response)
            .unwrap_or_else(|| Self::parse_query_lines(response));

        queries = queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        queries.truncate(num_queries);

        if queries.is_empty() {
            return Err(GranskeError::QueryAgent(format!(
                "No queries could be parsed from response: {}",
                &response[..response.len().min(500)]
            )));
        }

        Ok(queries)
    }

    /// Try to extract queries from JSON in the response.
    fn parse_json_queries(response: &str) -> Option<Vec<String>> {
        // A bare array, possibly wrapped in prose or code fences
        let json_start = response.find('[');
        let json_end = response.rfind(']');
        if let (Some(start), Some(end)) = (json_start, json_end) {
            if end > start {
                if let Ok(queries) = serde_json::from_str::<Vec<String>>(&response[start..=end]) {
                    return Some(queries);
                }
            }
        }

        // An object with a "queries" field
        let obj_start = response.find('{');
        let obj_end = response.rfind('}');
        if let (Some(start), Some(end)) = (obj_start, obj_end) {
            if end > start {
                if let Ok(list) = serde_json::from_str::<QueryList>(&response[start..=end]) {
                    return Some(list.queries);
                }
            }
        }

        None
    }

    /// Treat each non-empty line as a query, stripping list markers.
    fn parse_query_lines(response: &str) -> Vec<String> {
        response
            .lines()
            .filter(|line| !line.contains("```"))
            .map(Self::clean_query_line)
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn clean_query_line(line: &str) -> String {
        let mut s = line.trim();
        s = s.trim_start_matches(['-', '*']).trim_start();

        // Strip "1." or "2)" style numbering
        let without_digits = s.trim_start_matches(|c: char| c.is_ascii_digit());
        if without_digits.len() < s.len() {
            s = without_digits.trim_start_matches(['.', ')']).trim_start();
        }

        s.trim_end_matches(',').trim_matches('"').trim().to_string()
    }
}

#[derive(Debug, Deserialize)]
struct QueryList {
    queries: Vec<String>,
}

#[async_trait]
impl QueryGenerator for QueryAgent {
    #[instrument(skip(self), fields(instruction = %instruction))]
    async fn generate(&self, instruction: &str, num_queries: usize) -> Result<Vec<String>> {
        info!("Generating {} search queries", num_queries);

        let mut vars = HashMap::new();
        vars.insert("instruction".to_string(), instruction.to_string());
        vars.insert("num_queries".to_string(), num_queries.to_string());

        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.query.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.query.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| GranskeError::QueryAgent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| GranskeError::QueryAgent(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .build()
            .map_err(|e| GranskeError::QueryAgent(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            GranskeError::OpenAI(format!("Failed to generate search queries: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GranskeError::QueryAgent("Empty response from LLM".to_string()))?;

        debug!(
            "Query generation response: {}",
            &content[..content.len().min(500)]
        );

        let queries = Self::parse_queries(content, num_queries)?;
        info!("Generated {} queries", queries.len());
        Ok(queries)
    }
}
