//! Span helpers for tool executions

use crate::attributes::*;
use tracing::Span;

/// Attributes for tracing a tool call
#[derive(Debug, Clone)]
pub struct ToolSpanAttributes {
    pub tool_name: String,
    pub tool_description: String,
    pub tool_call_id: String,
    pub args_json: String,
}

/// Create the span a tool execution runs in.
///
/// The span is returned unentered so callers can attach it to a future with
/// `tracing::Instrument`.
pub fn tool_span(attrs: &ToolSpanAttributes) -> Span {
    tracing::info_span!(
        "execute_tool",
        { GEN_AI_SYSTEM } = SYSTEM_NAME,
        { GEN_AI_OPERATION_NAME } = "execute_tool",
        { GEN_AI_TOOL_NAME } = %attrs.tool_name,
        { GEN_AI_TOOL_DESCRIPTION } = %attrs.tool_description,
        { GEN_AI_TOOL_CALL_ID } = %attrs.tool_call_id,
        { ZMEM_TOOL_CALL_ARGS } = %attrs.args_json,
    )
}

/// Helper to safely serialize to JSON string
pub fn safe_serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<not serializable>".to_string())
}
