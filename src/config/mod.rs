//! Configuration module for Granske.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, QueryPrompts};
pub use settings::{
    ChatSettings, PromptSettings, ResearchSettings, ScraperSettings, SearchSettings, Settings,
};
