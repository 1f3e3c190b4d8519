mod common;

use common::harness;
use serde_json::json;
use std::sync::Arc;
use zmem_core::{ErrorKind, ToolContext};
use zmem_tool::DefaultToolContext;

#[tokio::test]
async fn test_toolset_lists_every_operation() {
    let h = harness();

    let mut names: Vec<&str> = h.toolset.list().iter().map(|t| t.name()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "add_memory",
            "check_memory",
            "delete_collection",
            "delete_memory",
            "get_memory_by_id",
            "grant_privilege",
            "list_collection_ids",
            "list_collections",
            "recall_memory",
            "recall_memory_hybrid",
            "recall_memory_with_distance",
            "summarize_collection",
            "summarize_memory",
            "update_memory_metadata",
        ]
    );

    for tool in h.toolset.list() {
        assert!(!tool.description().is_empty(), "{}", tool.name());
    }
}

#[tokio::test]
async fn test_validation_messages_reach_the_caller() {
    let h = harness();

    let cases = [
        ("add_memory", json!({"text": ""}), "Text content cannot be empty."),
        ("recall_memory", json!({"query": " "}), "Query cannot be empty."),
        ("check_memory", json!({"topic": ""}), "Topic cannot be empty."),
        ("delete_memory", json!({"doc_id": ""}), "doc_id cannot be empty."),
        (
            "update_memory_metadata",
            json!({"doc_id": "a", "metadata": {}}),
            "Metadata must be a non-empty dictionary.",
        ),
        (
            "list_collection_ids",
            json!({"collection_name": ""}),
            "Collection name cannot be empty.",
        ),
    ];

    for (tool, params, message) in cases {
        let envelope = h.call(tool, params).await.unwrap_err();
        assert_eq!(envelope.operation(), tool);
        assert_eq!(envelope.kind(), ErrorKind::Validation, "{}", tool);
        assert_eq!(envelope.message(), message, "{}", tool);
    }

    // Validation happens before any provider call
    assert_eq!(h.provider.embed_calls(), 0);
}

#[tokio::test]
async fn test_bad_params_are_validation_errors() {
    let h = harness();

    for params in [
        json!({}),
        json!({"query": 42}),
        json!({"query": "apple", "top_k": -1}),
        json!("apple"),
    ] {
        let envelope = h.call("recall_memory", params.clone()).await.unwrap_err();
        assert_eq!(envelope.kind(), ErrorKind::Validation, "{}", params);
    }

    let envelope = h
        .call("recall_memory", json!({"query": "apple", "top_k": 0}))
        .await
        .unwrap_err();
    assert_eq!(envelope.kind(), ErrorKind::Validation);

    let envelope = h
        .call(
            "recall_memory",
            json!({"query": "apple", "filter": {"$xor": []}}),
        )
        .await
        .unwrap_err();
    assert_eq!(envelope.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_unknown_tool() {
    let h = harness();

    let envelope = h.call("forget_everything", json!({})).await.unwrap_err();
    assert_eq!(envelope.kind(), ErrorKind::NotFound);
    assert_eq!(envelope.to_string(), "NotFoundError: Unknown tool: 'forget_everything'");
}

#[tokio::test]
async fn test_empty_model_response_is_reported() {
    let h = harness();
    h.call("add_memory", json!({"text": "apple pie"})).await.unwrap();
    h.provider.set_summary(None);

    let envelope = h
        .call("summarize_memory", json!({"query": "apple"}))
        .await
        .unwrap_err();
    assert_eq!(envelope.kind(), ErrorKind::Validation);
    assert_eq!(
        envelope.message(),
        "Summary generation failed (empty response from model)."
    );
}

#[tokio::test]
async fn test_call_with_explicit_context() {
    let h = harness();
    let ctx: Arc<dyn ToolContext> = Arc::new(DefaultToolContext::new(
        "call-42".to_string(),
        "inv-42".to_string(),
    ));

    let result = h
        .toolset
        .call_with_context("add_memory", json!({"text": "apple pie", "doc_id": "a"}), ctx)
        .await
        .unwrap();
    assert_eq!(result, json!("a"));
}
