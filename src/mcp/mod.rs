//! MCP (Model Context Protocol) implementation.

mod dispatcher;
pub mod server;
mod tools;
mod validate;

pub use dispatcher::Dispatcher;
pub use server::{McpServer, ServerError};
pub use tools::ToolRegistry;
pub use validate::validate_arguments;
