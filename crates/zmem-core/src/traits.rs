use super::{Content, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Tool context provided during tool execution
pub trait ToolContext: Send + Sync {
    fn function_call_id(&self) -> &str;
    fn invocation_id(&self) -> &str;
}

/// Tool trait - abstraction for callable tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the name of the tool
    fn name(&self) -> &str;

    /// Returns a description of what the tool does
    fn description(&self) -> &str;

    /// Returns the JSON schema for the tool's parameters
    fn schema(&self) -> serde_json::Value;

    /// Executes the tool with given parameters
    async fn execute(
        &self,
        ctx: Arc<dyn ToolContext>,
        params: serde_json::Value,
    ) -> Result<ToolResponse>;
}

/// Request to an LLM
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub model: String,
    pub contents: Vec<Content>,
}

impl LLMRequest {
    /// Single-turn request carrying one user prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            contents: vec![Content::new_user_text(prompt)],
        }
    }
}

/// Response from an LLM
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

impl LLMResponse {
    /// Generated text, if the model produced any
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(Content::text)
    }
}

/// Tool execution response
#[derive(Debug, Clone)]
pub struct ToolResponse {
    pub result: serde_json::Value,
}

