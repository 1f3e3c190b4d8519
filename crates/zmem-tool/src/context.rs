use uuid::Uuid;
use zmem_core::ToolContext;

/// Default implementation of ToolContext
#[derive(Debug, Clone)]
pub struct DefaultToolContext {
    function_call_id: String,
    invocation_id: String,
}

impl DefaultToolContext {
    pub fn new(function_call_id: String, invocation_id: String) -> Self {
        Self {
            function_call_id,
            invocation_id,
        }
    }

    /// Context for a call that arrived without ids of its own
    pub fn generated() -> Self {
        Self::new(
            format!("call-{}", Uuid::new_v4().simple()),
            format!("inv-{}", Uuid::new_v4().simple()),
        )
    }
}

impl ToolContext for DefaultToolContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }

    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_context_creation() {
        let ctx = DefaultToolContext::new("call-123".to_string(), "inv-456".to_string());

        assert_eq!(ctx.function_call_id(), "call-123");
        assert_eq!(ctx.invocation_id(), "inv-456");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DefaultToolContext::generated();
        let b = DefaultToolContext::generated();

        assert!(a.function_call_id().starts_with("call-"));
        assert_ne!(a.function_call_id(), b.function_call_id());
        assert_ne!(a.invocation_id(), b.invocation_id());
    }
}
