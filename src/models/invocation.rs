//! Tool invocation request and result models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single incoming tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// Correlates the request with its response on a shared transport
    pub request_id: String,

    /// Name of the tool to invoke
    pub tool: String,

    /// Raw arguments as supplied by the client
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocationRequest {
    pub fn new(request_id: impl Into<String>, tool: impl Into<String>, arguments: Value) -> Self {
        Self {
            request_id: request_id.into(),
            tool: tool.into(),
            arguments,
        }
    }
}

/// Classification of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    UnknownTool,
    InvalidArguments,
    ProviderError,
    TransportError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnknownTool => "UnknownTool",
            FailureKind::InvalidArguments => "InvalidArguments",
            FailureKind::ProviderError => "ProviderError",
            FailureKind::TransportError => "TransportError",
        }
    }

    /// Whether the failure was caused by the client's request
    pub fn is_client_error(&self) -> bool {
        matches!(self, FailureKind::UnknownTool | FailureKind::InvalidArguments)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema violation found while validating arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.reason)
    }
}

/// Error details of a failed invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(FailureKind::UnknownTool, format!("Unknown tool '{}'", name))
    }

    /// Build an `InvalidArguments` failure that reports every violation
    pub fn invalid_arguments(tool: &str, violations: Vec<FieldViolation>) -> Self {
        let details = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            kind: FailureKind::InvalidArguments,
            message: format!("Invalid arguments for '{}': {}", tool, details),
            violations,
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of a tool invocation
///
/// Serializes as `{"status": "success", "payload": ...}` or
/// `{"status": "error", "error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolInvocationResult {
    Success { payload: Value },
    Error { error: Failure },
}

impl ToolInvocationResult {
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    pub fn failure(failure: Failure) -> Self {
        Self::Error { error: failure }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if the invocation failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error } => Some(error.kind),
        }
    }

    pub fn into_result(self) -> Result<Value, Failure> {
        match self {
            Self::Success { payload } => Ok(payload),
            Self::Error { error } => Err(error),
        }
    }
}

/// Response sent back for a [`ToolInvocationRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub result: ToolInvocationResult,
}
