//! Granske - Web Research Tool
//!
//! A CLI tool and MCP server for researching topics on the live web.
//!
//! The name "Granske" comes from the Norwegian word for "investigate."
//!
//! # Overview
//!
//! Granske allows you to:
//! - Turn a research instruction into targeted web search queries with an LLM
//! - Run those queries against a hosted search API and merge the results
//! - Scrape the top result pages into plain text
//! - Compose a cited answer from the scraped sources
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `agents` - LLM agents for query generation and answering
//! - `search` - Web search provider abstraction
//! - `scrape` - Page scraping and text extraction
//! - `pipeline` - Research pipeline coordination
//! - `mcp` - MCP server for AI assistant integration
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use granske::config::Settings;
//! use granske::pipeline::ResearchPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = ResearchPipeline::new(settings)?;
//!
//!     // Research a topic on the live web
//!     let report = pipeline
//!         .research("current state of solid state batteries", None)
//!         .await?;
//!     println!("{}", report.to_json_pretty()?);
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod openai;
pub mod pipeline;
pub mod scrape;
pub mod search;

pub use error::{GranskeError, Result};
