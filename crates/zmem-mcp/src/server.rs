//! MCP server handler over the memory toolset

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::sync::Arc;
use zmem_core::{ErrorEnvelope, ErrorKind};
use zmem_tool::MemoryToolset;

/// Name reported to clients during initialization
pub const SERVER_NAME: &str = "zmem";

const INSTRUCTIONS: &str = "Semantic memory. Store text with add_memory, find it again with \
recall_memory, and summarize with summarize_memory. list_collections and delete_collection \
require calling grant_privilege immediately before.";

/// Map an envelope onto an MCP error, keeping its message
pub fn to_mcp_error(envelope: ErrorEnvelope) -> ErrorData {
    let message = envelope.message().to_string();
    match envelope.kind() {
        ErrorKind::Validation => ErrorData::invalid_params(message, None),
        _ => ErrorData::internal_error(message, None),
    }
}

/// Serves the memory toolset to MCP clients
#[derive(Clone)]
pub struct MemoryMcpServer {
    toolset: Arc<MemoryToolset>,
}

impl MemoryMcpServer {
    pub fn new(toolset: Arc<MemoryToolset>) -> Self {
        Self { toolset }
    }

    /// Tool descriptors advertised to clients
    pub fn tools(&self) -> Vec<McpTool> {
        self.toolset
            .list()
            .iter()
            .map(|tool| {
                let schema = match tool.schema() {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema),
                )
            })
            .collect()
    }

    /// Run one tool and render its JSON result as text content
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let params = arguments.map(Value::Object).unwrap_or(Value::Null);
        let result = self
            .toolset
            .call(name, params)
            .await
            .map_err(to_mcp_error)?;

        let text = serde_json::to_string(&result)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl ServerHandler for MemoryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(&request.name, request.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;
    use serde_json::json;
    use zmem_core::testing::MockProvider;
    use zmem_memory::MemoryService;
    use zmem_store::LocalVectorStore;

    fn server() -> MemoryMcpServer {
        let service = MemoryService::new(
            Arc::new(LocalVectorStore::in_memory()),
            Arc::new(MockProvider::new()),
        );
        let toolset = MemoryToolset::new(Arc::new(service)).unwrap();
        MemoryMcpServer::new(Arc::new(toolset))
    }

    fn args(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn text_of(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).unwrap();
        value["content"][0]["text"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_validation_maps_to_invalid_params() {
        let err = to_mcp_error(ErrorEnvelope::new(
            "recall_memory",
            ErrorKind::Validation,
            "Query cannot be empty.",
        ));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Query cannot be empty.");
    }

    #[test]
    fn test_other_kinds_map_to_internal_error() {
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::Privilege,
            ErrorKind::Upstream,
            ErrorKind::Store,
            ErrorKind::Internal,
        ] {
            let err = to_mcp_error(ErrorEnvelope::new("op", kind, "failed"));
            assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
            assert_eq!(err.message, "failed");
        }
    }

    #[test]
    fn test_tools_listing() {
        let tools = server().tools();
        assert_eq!(tools.len(), 14);

        let add = tools.iter().find(|t| t.name == "add_memory").unwrap();
        assert!(add.input_schema.contains_key("properties"));
        assert_eq!(add.input_schema["type"], "object");
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("grant_privilege"));
    }

    #[tokio::test]
    async fn test_dispatch_returns_json_text() {
        let server = server();

        let result = server
            .dispatch("add_memory", args(json!({"text": "hello", "doc_id": "h1"})))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "\"h1\"");

        let result = server
            .dispatch("get_memory_by_id", args(json!({"doc_id": "h1"})))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "\"hello\"");
    }

    #[tokio::test]
    async fn test_dispatch_without_arguments() {
        let result = server().dispatch("grant_privilege", None).await.unwrap();
        assert_eq!(text_of(&result), "true");
    }

    #[tokio::test]
    async fn test_dispatch_errors() {
        let server = server();

        let err = server
            .dispatch("add_memory", args(json!({"text": ""})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Text content cannot be empty.");

        let err = server
            .dispatch("delete_collection", args(json!({"collection_name": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("requires privilege"));
    }
}
