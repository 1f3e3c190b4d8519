//! # zmem Telemetry
//!
//! Structured logging for the memory service. Everything is written to
//! stderr; stdout belongs to the MCP transport.

mod spans;
mod subscriber;

pub use spans::{ToolSpanAttributes, safe_serialize, tool_span};
pub use subscriber::{DEFAULT_FILTER, TelemetryConfig, TelemetryError, init_telemetry};

/// Span attribute names.
///
/// Tool attributes follow the OpenTelemetry semantic conventions for
/// generative AI so spans line up with other agent tooling.
pub mod attributes {
    pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";
    pub const GEN_AI_SYSTEM: &str = "gen_ai.system";

    // Tool-specific attributes
    pub const GEN_AI_TOOL_NAME: &str = "gen_ai.tool.name";
    pub const GEN_AI_TOOL_DESCRIPTION: &str = "gen_ai.tool.description";
    pub const GEN_AI_TOOL_CALL_ID: &str = "gen_ai.tool.call.id";

    pub const ZMEM_TOOL_CALL_ARGS: &str = "zmem.tool.call_args";

    pub const SYSTEM_NAME: &str = "zmem";
}
