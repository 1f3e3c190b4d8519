//! Tool dispatch
//!
//! [`MemoryToolset`] owns the memory tools and is the only place their
//! failures are converted into [`ErrorEnvelope`]s.

use crate::context::DefaultToolContext;
use crate::memory_tools::memory_tools;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;
use zmem_core::{Error, ErrorEnvelope, Result, Tool, ToolContext, intercept};
use zmem_memory::MemoryService;
use zmem_telemetry::{ToolSpanAttributes, safe_serialize, tool_span};

pub struct MemoryToolset {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl MemoryToolset {
    /// Toolset exposing every memory operation of `service`
    pub fn new(service: Arc<MemoryService>) -> Result<Self> {
        Ok(Self::from_tools(memory_tools(service)?))
    }

    /// Toolset over an arbitrary tool list; later duplicates shadow earlier ones
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        let by_name = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name().to_string(), i))
            .collect();
        Self { tools, by_name }
    }

    pub fn list(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Call a tool with a fresh context
    pub async fn call(&self, name: &str, params: Value) -> std::result::Result<Value, ErrorEnvelope> {
        self.call_with_context(name, params, Arc::new(DefaultToolContext::generated()))
            .await
    }

    /// Call a tool, reporting any failure as an envelope named after the tool
    pub async fn call_with_context(
        &self,
        name: &str,
        params: Value,
        ctx: Arc<dyn ToolContext>,
    ) -> std::result::Result<Value, ErrorEnvelope> {
        let tool = self.get(name);
        let span = tool_span(&ToolSpanAttributes {
            tool_name: name.to_string(),
            tool_description: tool
                .as_ref()
                .map(|t| t.description().to_string())
                .unwrap_or_default(),
            tool_call_id: ctx.function_call_id().to_string(),
            args_json: safe_serialize(&params),
        });

        intercept(name, async move {
            let tool = tool.ok_or_else(|| Error::not_found(format!("Unknown tool: '{}'", name)))?;
            tracing::debug!(invocation_id = %ctx.invocation_id(), "Dispatching tool call");

            let response = tool.execute(ctx, params).await?;
            Ok::<_, Error>(response.result)
        })
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for MemoryToolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("MemoryToolset").field("tools", &names).finish()
    }
}
