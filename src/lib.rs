//! # Tavily MCP
//!
//! A Model Context Protocol (MCP) server exposing Tavily web search,
//! extraction, site mapping and crawling as tools over stdio and HTTP/SSE.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Tool definitions, parameter schemas, invocation requests and results
//! - [`provider`]: The [`Provider`] trait and the Tavily HTTP implementation
//! - [`mcp`]: Tool registry, dispatcher and the pmcp transport bindings
//! - [`utils`]: Shared HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod mcp;
pub mod models;
pub mod provider;
pub mod utils;

// Re-export commonly used types
pub use mcp::{Dispatcher, McpServer, ToolRegistry};
pub use provider::{Provider, TavilyProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
