//! Provider client adapters.
//!
//! This module defines the [`Provider`] trait that the dispatcher calls once
//! per validated invocation. [`TavilyProvider`] performs the real HTTP calls;
//! [`MockProvider`] records calls and returns canned responses for tests.
//!
//! # Adding a Tool
//!
//! 1. Add a variant to [`ToolKind`](crate::models::ToolKind)
//! 2. Add its definition to the [`ToolRegistry`](crate::mcp::ToolRegistry)
//! 3. Handle the new kind in each `Provider` implementation

pub mod mock;
mod tavily;

pub use mock::MockProvider;
pub use tavily::{TavilyProvider, DEFAULT_API_BASE_URL};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::{Failure, FailureKind, ToolKind};

/// Validated, fully-defaulted arguments for one tool call
pub type Arguments = Map<String, Value>;

/// A remote service able to execute the registered tools.
///
/// Implementations perform exactly one outbound call per `invoke` and must not
/// retry. The returned payload is passed to the client unmodified.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this provider
    fn name(&self) -> &str;

    /// Execute `tool` with the given arguments
    async fn invoke(&self, tool: ToolKind, arguments: Arguments) -> Result<Value, ProviderError>;
}

/// Errors that can occur when calling a provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected or failed the call (non-2xx or reported error)
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached, or its response could not be decoded
    #[error("{0}")]
    Transport(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Rejected(_) => FailureKind::ProviderError,
            ProviderError::Transport(_) => FailureKind::TransportError,
        }
    }
}

impl From<ProviderError> for Failure {
    fn from(err: ProviderError) -> Self {
        Failure::new(err.kind(), err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Transport(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            ProviderError::Transport(format!("Failed to decode provider response: {}", err))
        } else {
            ProviderError::Transport(format!("Network error: {}", err))
        }
    }
}
