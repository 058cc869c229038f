//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::pipeline::ResearchPipeline;
use serde_json::Value;
use std::io::{self, BufRead, Write};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "granske";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Granske.
pub struct McpServer {
    settings: Settings,
    pipeline: Option<ResearchPipeline>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            pipeline: None,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("Granske MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request).await {
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    ///
    /// Returns `None` for notifications, which must not be answered.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            eprintln!("Notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: Option<Value>, _params: Option<Value>) -> JsonRpcResponse {
        // Build the research pipeline lazily
        match ResearchPipeline::new(self.settings.clone()) {
            Ok(pipeline) => {
                self.pipeline = Some(pipeline);
                eprintln!("Research pipeline initialized");
            }
            Err(e) => {
                eprintln!("Failed to initialize pipeline: {}", e);
                return JsonRpcResponse::error(id, -32000, &format!("Init failed: {}", e));
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let result = match params.name.as_str() {
            "web_research" => self.tool_research(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Web research tool.
    async fn tool_research(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        // 'instruction' preferred, 'question' accepted in its place
        let instruction = match args
            .get("instruction")
            .and_then(|v| v.as_str())
            .or_else(|| args.get("question").and_then(|v| v.as_str()))
        {
            Some(i) => i,
            None => {
                return ToolCallResult::error(
                    "Missing 'instruction' argument (or 'question')".to_string(),
                )
            }
        };

        let num_queries = match args.get("num_queries") {
            None => None,
            Some(v) => match v.as_u64() {
                Some(n) if n > 0 => Some(n as usize),
                _ => {
                    return ToolCallResult::error(
                        "'num_queries' must be a positive integer".to_string(),
                    )
                }
            },
        };

        let pipeline = match &self.pipeline {
            Some(p) => p,
            None => return ToolCallResult::error("Server not initialized".to_string()),
        };

        match pipeline.research(instruction, num_queries).await {
            Ok(report) => match report.to_json_pretty() {
                Ok(json) => ToolCallResult::text(json),
                Err(e) => ToolCallResult::error(format!("Failed to serialize report: {}", e)),
            },
            Err(e) => ToolCallResult::error(format!("Research failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Answerer, QueryGenerator};
    use crate::error::Result;
    use crate::scrape::{PageScraper, ScrapedPage};
    use crate::search::{SearchHit, SearchProvider};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    fn request(method: &str, id: Option<Value>, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    struct CannedQuery;

    #[async_trait]
    impl QueryGenerator for CannedQuery {
        async fn generate(&self, _instruction: &str, num_queries: usize) -> Result<Vec<String>> {
            Ok(vec!["canned query".to_string(); num_queries])
        }
    }

    struct CannedSearch;

    #[async_trait]
    impl SearchProvider for CannedSearch {
        async fn search(&self, _queries: &[String]) -> Result<Vec<SearchHit>> {
            Ok(vec![SearchHit {
                title: "Result".to_string(),
                url: "https://a.example/page".to_string(),
                content: String::new(),
                score: 1.0,
                query: "canned query".to_string(),
            }])
        }
    }

    struct CannedScraper;

    #[async_trait]
    impl PageScraper for CannedScraper {
        async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
            Ok(ScrapedPage {
                url: url.to_string(),
                title: None,
                description: None,
                domain: None,
                content: "page body".to_string(),
            })
        }
    }

    struct CannedQa;

    #[async_trait]
    impl Answerer for CannedQa {
        async fn answer(&self, _question: &str, _pages: &[ScrapedPage]) -> Result<String> {
            Ok("canned answer".to_string())
        }
    }

    fn server_with_stub_pipeline() -> McpServer {
        let mut server = McpServer::new(Settings::default());
        server.pipeline = Some(ResearchPipeline::with_components(
            Settings::default(),
            Arc::new(CannedQuery),
            Arc::new(CannedSearch),
            Arc::new(CannedScraper),
            Arc::new(CannedQa),
        ));
        server
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request("initialize", Some(json!(1)), None))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "granske");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request("notifications/initialized", None, None))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_contains_web_research() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request("tools/list", Some(json!(2)), None))
            .await
            .unwrap();

        let result = response.result.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["web_research"]);
    }

    #[tokio::test]
    async fn test_unknown_method_is_an_error() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request("resources/list", Some(json!(3)), None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request("tools/call", Some(json!(4)), None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!(5)),
                Some(json!({"name": "summarize", "arguments": {}})),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_research_requires_instruction() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!(6)),
                Some(json!({"name": "web_research", "arguments": {}})),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("instruction"));
    }

    #[tokio::test]
    async fn test_research_rejects_bad_num_queries() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!(7)),
                Some(json!({
                    "name": "web_research",
                    "arguments": {"instruction": "x", "num_queries": "three"}
                })),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("num_queries"));
    }

    #[tokio::test]
    async fn test_research_before_initialize() {
        let mut server = McpServer::new(Settings::default());
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!(8)),
                Some(json!({"name": "web_research", "arguments": {"instruction": "x"}})),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("not initialized"));
    }

    #[tokio::test]
    async fn test_research_accepts_question_alias() {
        let mut server = server_with_stub_pipeline();
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!(9)),
                Some(json!({"name": "web_research", "arguments": {"question": "what is y"}})),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());

        let text = result["content"][0]["text"].as_str().unwrap();
        let report: Value = serde_json::from_str(text).unwrap();
        assert_eq!(report["queries"].as_array().unwrap().len(), 3);
        assert_eq!(report["top_urls"][0], "https://a.example/page");
        assert_eq!(report["answer"], "canned answer");
    }
}
