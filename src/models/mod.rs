//! Core data models for tool definitions and invocations.

mod invocation;
mod schema;

pub use invocation::{
    Failure, FailureKind, FieldViolation, ToolInvocationRequest, ToolInvocationResponse,
    ToolInvocationResult,
};
pub use schema::{ParamSpec, ParamType, ToolDefinition, ToolKind};
