//! # zmem Tools
//!
//! The memory service as a set of JSON tools, and the dispatcher that runs
//! them.

pub mod context;
pub mod function_tool;
pub mod memory_tools;
pub mod schema;
pub mod toolset;

pub use context::DefaultToolContext;
pub use function_tool::{FunctionTool, FunctionToolBuilder, parse_params};
pub use memory_tools::{NoParams, memory_tools};
pub use schema::generate_schema;
pub use toolset::MemoryToolset;

// Re-export core types
pub use zmem_core::{Result, Tool, ToolContext, ToolResponse};
