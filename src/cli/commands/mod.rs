//! CLI command implementations.

mod config;
mod doctor;
mod init;
mod mcp;
mod research;
mod scrape;
mod search;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use mcp::run_mcp;
pub use research::run_research;
pub use scrape::run_scrape;
pub use search::run_search;
pub use serve::run_serve;
