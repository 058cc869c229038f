//! MCP (Model Context Protocol) server for Granske.
//!
//! Allows AI assistants like Claude to run web research as a tool.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
