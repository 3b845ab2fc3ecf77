//! Mock provider for testing purposes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{Arguments, Provider, ProviderError};
use crate::models::ToolKind;

/// A mock provider that records every call and returns predefined responses.
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<ToolKind, Result<Value, ProviderError>>>,
    calls: Mutex<Vec<(ToolKind, Arguments)>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned for a tool.
    pub fn set_response(&self, tool: ToolKind, response: Result<Value, ProviderError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tool, response);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<(ToolKind, Arguments)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Arguments of the most recent call.
    pub fn last_arguments(&self) -> Option<Arguments> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, args)| args.clone())
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock Provider"
    }

    async fn invoke(&self, tool: ToolKind, arguments: Arguments) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((tool, arguments));

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        match responses.get(&tool) {
            Some(response) => response.clone(),
            None => Ok(json!({ "results": [] })),
        }
    }
}
