//! Research pipeline for Granske.
//!
//! Coordinates the four steps of a research request: query generation,
//! web search, page scraping, and answer composition.

use crate::agents::{Answerer, QaAgent, QueryAgent, QueryGenerator};
use crate::config::{Prompts, Settings};
use crate::error::{GranskeError, Result};
use crate::scrape::{PageScraper, ScrapedPage, WebpageScraper};
use crate::search::{SearchHit, SearchProvider, TavilySearch};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main pipeline for research requests.
pub struct ResearchPipeline {
    settings: Settings,
    query: Arc<dyn QueryGenerator>,
    search: Arc<dyn SearchProvider>,
    scraper: Arc<dyn PageScraper>,
    qa: Arc<dyn Answerer>,
}

impl ResearchPipeline {
    /// Create a new pipeline with default components.
    pub fn new(settings: Settings) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let query: Arc<dyn QueryGenerator> =
            Arc::new(QueryAgent::new(settings.chat.clone()).with_prompts(prompts.clone()));
        let search: Arc<dyn SearchProvider> = Arc::new(TavilySearch::new(settings.search.clone()));
        let scraper: Arc<dyn PageScraper> = Arc::new(WebpageScraper::new(settings.scraper.clone()));
        let qa: Arc<dyn Answerer> =
            Arc::new(QaAgent::new(settings.chat.clone()).with_prompts(prompts));

        Ok(Self {
            settings,
            query,
            search,
            scraper,
            qa,
        })
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        query: Arc<dyn QueryGenerator>,
        search: Arc<dyn SearchProvider>,
        scraper: Arc<dyn PageScraper>,
        qa: Arc<dyn Answerer>,
    ) -> Self {
        Self {
            settings,
            query,
            search,
            scraper,
            qa,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the search provider.
    pub fn search_provider(&self) -> Arc<dyn SearchProvider> {
        self.search.clone()
    }

    /// Get the page scraper.
    pub fn page_scraper(&self) -> Arc<dyn PageScraper> {
        self.scraper.clone()
    }

    /// Run a full research request: generate queries, search, scrape, answer.
    #[instrument(skip(self), fields(instruction = %instruction))]
    pub async fn research(
        &self,
        instruction: &str,
        num_queries: Option<usize>,
    ) -> Result<ResearchReport> {
        let num_queries = num_queries.unwrap_or(self.settings.research.num_queries);
        if num_queries == 0 {
            return Err(GranskeError::InvalidInput(
                "num_queries must be at least 1".to_string(),
            ));
        }

        info!("Starting research");
        let queries = self.query.generate(instruction, num_queries).await?;

        let hits = self.search.search(&queries).await?;
        info!("Search returned {} results", hits.len());

        let top_hits: Vec<SearchHit> = hits
            .into_iter()
            .take(self.settings.research.top_results)
            .collect();

        // Pages are scraped one at a time; a failed scrape fails the request.
        let mut pages: Vec<ScrapedPage> = Vec::with_capacity(top_hits.len());
        for hit in &top_hits {
            info!("Scraping {}", hit.url);
            let page = self.scraper.scrape(&hit.url).await?;
            pages.push(page);
        }

        let answer = self.qa.answer(instruction, &pages).await?;

        Ok(ResearchReport {
            queries,
            top_urls: top_hits.into_iter().map(|h| h.url).collect(),
            answer,
        })
    }
}

/// Result of a research request.
///
/// Serializes with the field order callers rely on: queries, then the
/// scraped URLs, then the answer.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    /// Search queries the model generated.
    pub queries: Vec<String>,
    /// URLs of the pages that were scraped, best score first.
    pub top_urls: Vec<String>,
    /// The composed answer, as markdown.
    pub answer: String,
}

impl ResearchReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format the report for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.top_urls.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for (i, url) in self.top_urls.iter().enumerate() {
                output.push_str(&format!("\n[{}] {}", i + 1, url));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the order in which pipeline steps run.
    type CallLog = Arc<Mutex<Vec<String>>>;

    struct StubQuery {
        log: CallLog,
    }

    #[async_trait]
    impl QueryGenerator for StubQuery {
        async fn generate(&self, _instruction: &str, num_queries: usize) -> Result<Vec<String>> {
            self.log.lock().unwrap().push("generate".to_string());
            Ok((0..num_queries).map(|i| format!("query {}", i)).collect())
        }
    }

    struct StubSearch {
        log: CallLog,
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, queries: &[String]) -> Result<Vec<SearchHit>> {
            self.log
                .lock()
                .unwrap()
                .push(format!("search:{}", queries.len()));
            Ok(self.hits.clone())
        }
    }

    struct StubScraper {
        log: CallLog,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl PageScraper for StubScraper {
        async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
            self.log.lock().unwrap().push(format!("scrape:{}", url));
            if self.fail_on.as_deref() == Some(url) {
                return Err(GranskeError::scrape(url, "stub failure"));
            }
            Ok(ScrapedPage {
                url: url.to_string(),
                title: None,
                description: None,
                domain: None,
                content: format!("content of {}", url),
            })
        }
    }

    struct StubQa {
        log: CallLog,
    }

    #[async_trait]
    impl Answerer for StubQa {
        async fn answer(&self, _question: &str, pages: &[ScrapedPage]) -> Result<String> {
            self.log
                .lock()
                .unwrap()
                .push(format!("answer:{}", pages.len()));
            Ok("stub answer".to_string())
        }
    }

    fn hit(url: &str, score: f64) -> SearchHit {
        SearchHit {
            title: url.to_string(),
            url: url.to_string(),
            content: String::new(),
            score,
            query: "q".to_string(),
        }
    }

    fn pipeline_with(hits: Vec<SearchHit>, fail_on: Option<String>) -> (ResearchPipeline, CallLog) {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let pipeline = ResearchPipeline::with_components(
            Settings::default(),
            Arc::new(StubQuery { log: log.clone() }),
            Arc::new(StubSearch {
                log: log.clone(),
                hits,
            }),
            Arc::new(StubScraper {
                log: log.clone(),
                fail_on,
            }),
            Arc::new(StubQa { log: log.clone() }),
        );
        (pipeline, log)
    }

    #[tokio::test]
    async fn test_research_runs_steps_in_order() {
        let hits = vec![hit("https://a.example", 0.9), hit("https://b.example", 0.8)];
        let (pipeline, log) = pipeline_with(hits, None);

        let report = pipeline.research("what is x", None).await.unwrap();

        let calls = log.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "generate",
                "search:3",
                "scrape:https://a.example",
                "scrape:https://b.example",
                "answer:2"
            ]
        );
        assert_eq!(report.queries.len(), 3);
        assert_eq!(
            report.top_urls,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(report.answer, "stub answer");
    }

    #[tokio::test]
    async fn test_research_scrapes_only_top_results() {
        let hits: Vec<SearchHit> = (0..8)
            .map(|i| hit(&format!("https://site{}.example", i), 1.0 - i as f64 * 0.1))
            .collect();
        let (pipeline, log) = pipeline_with(hits, None);

        let report = pipeline.research("what is x", Some(2)).await.unwrap();

        // Default top_results is 5
        assert_eq!(report.top_urls.len(), 5);
        let calls = log.lock().unwrap().clone();
        assert_eq!(calls.iter().filter(|c| c.starts_with("scrape:")).count(), 5);
    }

    #[tokio::test]
    async fn test_research_num_queries_override() {
        let (pipeline, log) = pipeline_with(vec![], None);

        let report = pipeline.research("what is x", Some(7)).await.unwrap();

        assert_eq!(report.queries.len(), 7);
        let calls = log.lock().unwrap().clone();
        assert!(calls.contains(&"search:7".to_string()));
    }

    #[tokio::test]
    async fn test_research_scrape_failure_aborts() {
        let hits = vec![hit("https://a.example", 0.9), hit("https://b.example", 0.8)];
        let (pipeline, log) = pipeline_with(hits, Some("https://a.example".to_string()));

        let result = pipeline.research("what is x", None).await;

        assert!(result.is_err());
        let calls = log.lock().unwrap().clone();
        // The failing scrape is the last call; the answer step never runs.
        assert_eq!(calls.last().unwrap(), "scrape:https://a.example");
        assert!(!calls.iter().any(|c| c.starts_with("answer")));
    }

    #[tokio::test]
    async fn test_research_rejects_zero_queries() {
        let (pipeline, _log) = pipeline_with(vec![], None);
        let result = pipeline.research("what is x", Some(0)).await;
        assert!(matches!(result, Err(GranskeError::InvalidInput(_))));
    }

    #[test]
    fn test_report_json_field_order() {
        let report = ResearchReport {
            queries: vec!["q1".to_string()],
            top_urls: vec!["https://a.example".to_string()],
            answer: "done".to_string(),
        };

        let json = report.to_json_pretty().unwrap();
        let queries_at = json.find("\"queries\"").unwrap();
        let urls_at = json.find("\"top_urls\"").unwrap();
        let answer_at = json.find("\"answer\"").unwrap();
        assert!(queries_at < urls_at);
        assert!(urls_at < answer_at);
    }

    #[test]
    fn test_report_display_lists_sources() {
        let report = ResearchReport {
            queries: vec![],
            top_urls: vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
            ],
            answer: "The answer.".to_string(),
        };

        let display = report.format_for_display();
        assert!(display.starts_with("The answer."));
        assert!(display.contains("[1] https://a.example"));
        assert!(display.contains("[2] https://b.example"));
    }
}
