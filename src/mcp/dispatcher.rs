//! Transport-agnostic tool dispatcher.
//!
//! The dispatcher owns the tool registry and the provider. Both transports
//! hand it a [`ToolInvocationRequest`] and get back a [`ToolInvocationResult`].

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::tools::ToolRegistry;
use super::validate::validate_arguments;
use crate::models::{
    Failure, FailureKind, ToolInvocationRequest, ToolInvocationResponse, ToolInvocationResult,
};
use crate::provider::Provider;

/// Routes tool invocations to the provider
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    provider: Arc<dyn Provider>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, provider: Arc<dyn Provider>) -> Self {
        Self { registry, provider }
    }

    /// Dispatcher over the standard four-tool registry
    pub fn with_provider(provider: Arc<dyn Provider>) -> Self {
        Self::new(Arc::new(ToolRegistry::new()), provider)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Process one request end to end.
    pub async fn handle(&self, request: ToolInvocationRequest) -> ToolInvocationResponse {
        let result = self.dispatch(&request.request_id, &request.tool, &request.arguments).await;
        ToolInvocationResponse {
            request_id: request.request_id,
            result,
        }
    }

    /// Look up, validate, default and invoke a tool.
    ///
    /// The provider call runs on its own task, so it completes even if the
    /// caller stops waiting for the result.
    pub async fn dispatch(
        &self,
        request_id: &str,
        tool_name: &str,
        arguments: &Value,
    ) -> ToolInvocationResult {
        let Some(tool) = self.registry.get(tool_name) else {
            tracing::warn!(request_id, tool = tool_name, "Unknown tool requested");
            return ToolInvocationResult::failure(Failure::unknown_tool(tool_name));
        };

        let resolved = match validate_arguments(tool, arguments) {
            Ok(resolved) => resolved,
            Err(violations) => {
                tracing::info!(
                    request_id,
                    tool = tool_name,
                    violations = violations.len(),
                    "Rejected invalid arguments"
                );
                return ToolInvocationResult::failure(Failure::invalid_arguments(
                    tool_name, violations,
                ));
            }
        };

        let kind = tool.kind;
        let provider = Arc::clone(&self.provider);
        let started = Instant::now();

        let outcome = tokio::spawn(async move { provider.invoke(kind, resolved).await }).await;

        let result = match outcome {
            Ok(Ok(payload)) => ToolInvocationResult::success(payload),
            Ok(Err(err)) => ToolInvocationResult::failure(err.into()),
            Err(join_err) => ToolInvocationResult::failure(Failure::new(
                FailureKind::TransportError,
                format!("Provider call aborted: {}", join_err),
            )),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            ToolInvocationResult::Success { .. } => {
                tracing::info!(
                    request_id,
                    tool = tool_name,
                    provider = self.provider.name(),
                    elapsed_ms,
                    "Tool call succeeded"
                );
            }
            ToolInvocationResult::Error { error } => {
                tracing::warn!(
                    request_id,
                    tool = tool_name,
                    provider = self.provider.name(),
                    elapsed_ms,
                    kind = %error.kind,
                    "Tool call failed: {}",
                    error.message
                );
            }
        }

        result
    }
}
