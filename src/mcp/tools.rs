//! MCP tool definitions for Granske.

use super::protocol::Tool;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![Tool {
        name: "web_research".to_string(),
        description: "Research a topic on the live web. Generates search queries from the \
            instruction, runs them against a web search API, scrapes the top result pages, and \
            composes a cited answer. Returns a JSON report with the queries, the scraped URLs, \
            and the answer."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "instruction": {
                    "type": "string",
                    "description": "The research instruction or question to investigate"
                },
                "question": {
                    "type": "string",
                    "description": "Accepted in place of 'instruction'; ignored when both are given"
                },
                "num_queries": {
                    "type": "integer",
                    "description": "Number of search queries to generate",
                    "default": 3
                }
            },
            "required": []
        }),
    }]
}
