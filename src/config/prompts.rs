//! Prompt templates for Granske.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub query: QueryPrompts,
    pub qa: QaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for search-query generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QueryPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert at crafting web-search queries.

Given a research instruction, produce search-engine-style queries that together cover the topic.

Guidelines:
- Parse the instruction for its key entities and concepts
- Write each query the way you would type it into a search engine (keywords, not full sentences)
- Vary the phrasing across queries to capture breadth
- Do not number the queries or add commentary

Respond with a JSON array of exactly {{num_queries}} query strings. Example:
["solid state battery energy density 2025", "sulfide electrolyte manufacturing challenges"]"#
                .to_string(),

            user: r#"Research instruction: {{instruction}}

Produce exactly {{num_queries}} web-search queries as a JSON array of strings."#
                .to_string(),
        }
    }
}

/// Prompts for answer composition from scraped pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a senior research analyst. You answer questions using only the scraped web pages provided as context.

Guidelines:
- Read all of the provided context before answering
- Extract facts that are corroborated across sources; note when a claim appears in only one source
- Compose a direct answer to the question, citing sources inline with numbered references like [1]
- End with a numbered reference list mapping each number to its source URL
- If the context does not contain enough information, say so clearly instead of guessing

Return the answer as markdown."#
                .to_string(),

            user: r#"Question: {{question}}

Scraped sources:

{{context}}

Answer the question based on the above sources, with numbered references."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let query_path = custom_path.join("query.toml");
            if query_path.exists() {
                let content = std::fs::read_to_string(&query_path)?;
                prompts.query = toml::from_str(&content)?;
            }

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.query.system.is_empty());
        assert!(!prompts.qa.system.is_empty());
        assert!(prompts.query.user.contains("{{num_queries}}"));
        assert!(prompts.qa.user.contains("{{context}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Research {{topic}} using {{count}} queries.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("topic".to_string(), "photonic qubits".to_string());
        vars.insert("count".to_string(), "2".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Research photonic qubits using 2 queries.");
    }

    #[test]
    fn test_custom_variables_lose_to_call_site() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "formal".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("tone".to_string(), "casual".to_string());

        let result = prompts.render_with_custom("Be {{tone}}.", &vars);
        assert_eq!(result, "Be casual.");
    }

    #[test]
    fn test_load_custom_prompt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("query.toml"),
            r#"
            system = "custom system"
            user = "custom user {{instruction}}"
            "#,
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.query.system, "custom system");
        // Untouched sections keep their defaults.
        assert!(prompts.qa.system.contains("research analyst"));
    }
}
