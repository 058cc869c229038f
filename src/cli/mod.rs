//! CLI module for Granske.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Granske - Web Research Tool
///
/// A CLI tool for researching topics on the live web: it generates search
/// queries with an LLM, runs them against a search API, scrapes the top
/// results, and composes a cited answer.
/// The name "Granske" comes from the Norwegian word for "investigate."
#[derive(Parser, Debug)]
#[command(name = "granske")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Granske and verify API configuration
    Init,

    /// Check API keys and configuration
    Doctor,

    /// Research a topic: generate queries, search the web, scrape, answer
    Research {
        /// Research instruction or question
        instruction: String,

        /// Number of search queries to generate
        #[arg(short, long)]
        queries: Option<usize>,

        /// Print the raw JSON report instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Run web searches and print the merged results
    Search {
        /// Search queries (each runs as its own search)
        #[arg(required = true)]
        queries: Vec<String>,

        /// Maximum number of merged results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Scrape a single page and print its text content
    Scrape {
        /// URL to scrape
        url: String,

        /// Print extracted text only, without metadata
        #[arg(long)]
        raw: bool,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
