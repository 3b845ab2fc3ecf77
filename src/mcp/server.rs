//! MCP server implementation using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! This module binds the [`Dispatcher`] to the two transports: JSON-RPC over
//! stdio and streamable HTTP with server-sent events. Framing and
//! malformed-frame handling are left to pmcp; each registered tool is a thin
//! wrapper that forwards to the shared dispatcher.
//!
//! Every dispatched call answers with a normal tool result whose text content
//! is the serialized [`ToolInvocationResult`]:
//!
//! ```json
//! {"status": "success", "payload": {...}}
//! {"status": "error", "error": {"kind": "InvalidArguments", "message": "...", "violations": [...]}}
//! ```
//!
//! Calls naming a tool that is not registered never reach the dispatcher;
//! pmcp answers them with a JSON-RPC error ("Tool '<name>' not found").

use crate::mcp::dispatcher::Dispatcher;
use crate::models::{ToolInvocationRequest, ToolInvocationResult};
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer,
    Error, RequestHandlerExtra, Server, ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Errors raised while starting a transport
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("MCP server error: {0}")]
    Protocol(#[from] pmcp::Error),
}

/// The MCP server for Tavily
///
/// Both transports are built from the same dispatcher, so validation and the
/// error taxonomy are shared.
#[derive(Debug, Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server around a dispatcher
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build the pmcp server with one handler per registered tool
    fn build_server(&self) -> Result<Server, pmcp::Error> {
        let mut builder = Server::builder()
            .name("tavily-mcp")
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());

        for handler in self.tool_handlers() {
            builder = builder.tool(handler.name.clone(), handler);
        }

        builder.build()
    }

    fn tool_handlers(&self) -> Vec<ToolWrapper> {
        self.dispatcher
            .registry()
            .list()
            .iter()
            .map(|tool| ToolWrapper {
                name: tool.name().to_string(),
                description: Some(tool.description.to_string()),
                input_schema: tool.input_schema(),
                dispatcher: Arc::clone(&self.dispatcher),
            })
            .collect()
    }

    /// Run the server in stdio mode until the client closes stdin
    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server in stdio mode");
        let server = self.build_server()?;
        server.run_stdio().await?;
        tracing::info!("stdio client disconnected, shutting down");
        Ok(())
    }

    /// Run the server in HTTP/SSE mode
    ///
    /// Returns the bound address and the task serving connections. Each
    /// client session is independent of the others.
    pub async fn run_sse(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
        let socket_addr = parse_listen_addr(addr)?;
        tracing::info!("Starting MCP server in HTTP/SSE mode on {}", socket_addr);

        let server = Arc::new(Mutex::new(self.build_server()?));
        let http_server = StreamableHttpServer::new(socket_addr, server);

        Ok(http_server.start().await?)
    }
}

/// Parse a `host:port` listen address
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    addr.parse().map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

/// Render a dispatcher outcome as the tool result body
fn into_tool_output(result: &ToolInvocationResult) -> Result<Value, Error> {
    serde_json::to_value(result)
        .map_err(|e| Error::internal(format!("Failed to serialize tool result: {}", e)))
}

/// Adapts one registry entry to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    dispatcher: Arc<Dispatcher>,
}

impl ToolWrapper {
    /// Dispatch one call under the client's JSON-RPC request id
    async fn call(&self, request_id: String, args: Value) -> Result<Value, Error> {
        let request = ToolInvocationRequest::new(request_id, self.name.as_str(), args);
        let response = self.dispatcher.handle(request).await;
        into_tool_output(&response.result)
    }
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.call(extra.request_id, args).await
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Failure, FailureKind, FieldViolation};
    use crate::provider::MockProvider;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(Dispatcher::with_provider(Arc::new(MockProvider::new())))
    }

    #[test]
    fn test_one_handler_per_tool() {
        let handlers = server().tool_handlers();
        let names: Vec<&str> = handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["search", "extract", "map", "crawl"]);
        assert!(handlers.iter().all(|h| h.input_schema["type"] == "object"));
    }

    #[test]
    fn test_build_server() {
        assert!(server().build_server().is_ok());
    }

    #[test]
    fn test_parse_listen_addr() {
        assert_eq!(
            parse_listen_addr("0.0.0.0:8000").unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
        let err = parse_listen_addr("localhost").unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
    }

    #[test]
    fn test_success_output_is_tagged() {
        let payload = json!({"results": ["https://example.com/docs"]});
        let value = into_tool_output(&ToolInvocationResult::success(payload.clone())).unwrap();
        assert_eq!(value, json!({"status": "success", "payload": payload}));
    }

    #[test]
    fn test_failure_output_carries_kind() {
        let invalid = Failure::invalid_arguments(
            "extract",
            vec![FieldViolation::new("urls", "is required")],
        );
        let value = into_tool_output(&ToolInvocationResult::failure(invalid)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "InvalidArguments");
        assert_eq!(value["error"]["violations"][0]["field"], "urls");

        let provider = Failure::new(FailureKind::ProviderError, "HTTP 401: Invalid API key");
        let value = into_tool_output(&ToolInvocationResult::failure(provider)).unwrap();
        assert_eq!(value["error"]["kind"], "ProviderError");
        assert!(value["error"]["message"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn test_wrapper_forwards_to_dispatcher() {
        let provider = Arc::new(MockProvider::new());
        let server = McpServer::new(Dispatcher::with_provider(provider.clone()));
        let wrapper = server
            .tool_handlers()
            .into_iter()
            .find(|h| h.name == "map")
            .unwrap();

        let value = wrapper
            .call("7".to_string(), json!({"url": "https://example.com"}))
            .await
            .unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(provider.call_count(), 1);

        let value = wrapper.call("8".to_string(), json!({})).await.unwrap();
        assert_eq!(value["error"]["kind"], "InvalidArguments");
        assert_eq!(provider.call_count(), 1);
    }
}
