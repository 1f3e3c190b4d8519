use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use zmem_core::{Error, Result, Tool, ToolContext, ToolResponse};

/// Type alias for tool execution function
pub type ToolFn = Box<
    dyn Fn(
            Arc<dyn ToolContext>,
            Value,
        ) -> Pin<Box<dyn Future<Output = Result<ToolResponse>> + Send>>
        + Send
        + Sync,
>;

/// Deserialize tool parameters; a missing body counts as `{}`
pub fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    let params = match params {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(params)
        .map_err(|e| Error::validation(format!("Invalid parameters: {}", e)))
}

/// A function-based tool implementation
pub struct FunctionTool {
    name: String,
    description: String,
    schema: Value,
    execute_fn: ToolFn,
}

impl FunctionTool {
    pub fn builder() -> FunctionToolBuilder {
        FunctionToolBuilder::new()
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish()
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, params: Value) -> Result<ToolResponse> {
        (self.execute_fn)(ctx, params).await
    }
}

/// Builder for FunctionTool
pub struct FunctionToolBuilder {
    name: Option<String>,
    description: Option<String>,
    schema: Option<Value>,
    execute_fn: Option<ToolFn>,
}

impl FunctionToolBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            schema: None,
            execute_fn: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn execute<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<dyn ToolContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResponse>> + Send + 'static,
    {
        self.execute_fn = Some(Box::new(move |ctx, params| Box::pin(f(ctx, params))));
        self
    }

    /// Typed variant of [`execute`](Self::execute).
    ///
    /// Parameters are deserialized into `Req` (failures are validation
    /// errors) and the handler's output is returned as the JSON result.
    pub fn handler<Req, Out, F, Fut>(self, f: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Out: Serialize + Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Out>> + Send + 'static,
    {
        self.execute(move |_ctx, params| {
            let call = parse_params::<Req>(params).map(&f);
            async move {
                let output = call?.await?;
                Ok::<_, Error>(ToolResponse {
                    result: serde_json::to_value(output)?,
                })
            }
        })
    }

    pub fn build(self) -> Result<FunctionTool> {
        Ok(FunctionTool {
            name: self
                .name
                .ok_or_else(|| Error::message("Tool name is required"))?,
            description: self
                .description
                .ok_or_else(|| Error::message("Tool description is required"))?,
            schema: self.schema.unwrap_or(Value::Null),
            execute_fn: self
                .execute_fn
                .ok_or_else(|| Error::message("Tool execute function is required"))?,
        })
    }
}

impl Default for FunctionToolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DefaultToolContext;
    use crate::schema::generate_schema;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use zmem_core::ErrorKind;

    fn ctx() -> Arc<dyn ToolContext> {
        Arc::new(DefaultToolContext::new(
            "call-1".to_string(),
            "inv-1".to_string(),
        ))
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        text: String,
        #[serde(default)]
        times: Option<usize>,
    }

    fn echo_tool() -> FunctionTool {
        FunctionTool::builder()
            .name("echo")
            .description("Repeats text")
            .schema(generate_schema::<EchoParams>())
            .handler(|params: EchoParams| async move {
                if params.text.is_empty() {
                    return Err(Error::validation("Text content cannot be empty."));
                }
                Ok(params.text.repeat(params.times.unwrap_or(1)))
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_function_tool_creation() {
        let tool = FunctionTool::builder()
            .name("count")
            .description("Counts parameters")
            .execute(|_ctx, params| async move {
                let count = params.as_object().map(|o| o.len()).unwrap_or(0);
                Ok(ToolResponse {
                    result: serde_json::json!({"count": count}),
                })
            })
            .build()
            .unwrap();

        assert_eq!(tool.name(), "count");
        assert_eq!(tool.description(), "Counts parameters");
        assert_eq!(tool.schema(), Value::Null);

        let params = serde_json::json!({"a": 1, "b": 2});
        let response = tool.execute(ctx(), params).await.unwrap();
        assert_eq!(response.result["count"], 2);
    }

    #[tokio::test]
    async fn test_handler_serializes_output() {
        let response = echo_tool()
            .execute(ctx(), serde_json::json!({"text": "ab", "times": 2}))
            .await
            .unwrap();

        assert_eq!(response.result, serde_json::json!("abab"));
    }

    #[tokio::test]
    async fn test_handler_rejects_bad_params() {
        let err = echo_tool()
            .execute(ctx(), serde_json::json!({"times": 2}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("missing field `text`"));

        let err = echo_tool()
            .execute(ctx(), serde_json::json!({"text": 5}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_handler_propagates_operation_errors() {
        let err = echo_tool()
            .execute(ctx(), serde_json::json!({"text": ""}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Text content cannot be empty.");
    }

    #[test]
    fn test_build_requires_name_and_function() {
        let err = FunctionTool::builder()
            .description("no name")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("name is required"));

        let err = FunctionTool::builder()
            .name("noop")
            .description("no function")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("execute function is required"));
    }

    #[test]
    fn test_null_params_parse_as_empty_object() {
        #[derive(Debug, Deserialize)]
        struct Empty {}

        assert!(parse_params::<Empty>(Value::Null).is_ok());
    }
}
