//! The memory operations exposed as tools

use crate::function_tool::FunctionTool;
use crate::schema::generate_schema;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use zmem_core::{Error, Result, Tool};
use zmem_memory::*;

/// Parameters of tools that take none
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Build one tool around a service operation.
fn memory_tool<Req, Out, F, Fut>(
    service: &Arc<MemoryService>,
    name: &str,
    description: &str,
    op: F,
) -> Result<Arc<dyn Tool>>
where
    Req: DeserializeOwned + JsonSchema + Send + 'static,
    Out: Serialize + Send + 'static,
    F: Fn(Arc<MemoryService>, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out>> + Send + 'static,
{
    let service = Arc::clone(service);
    let tool = FunctionTool::builder()
        .name(name)
        .description(description)
        .schema(generate_schema::<Req>())
        .handler(move |request: Req| op(Arc::clone(&service), request))
        .build()?;
    Ok(Arc::new(tool))
}

/// Same as [`memory_tool`] for operations without parameters.
fn bare_tool<Out, F, Fut>(
    service: &Arc<MemoryService>,
    name: &str,
    description: &str,
    op: F,
) -> Result<Arc<dyn Tool>>
where
    Out: Serialize + Send + 'static,
    F: Fn(Arc<MemoryService>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out>> + Send + 'static,
{
    let service = Arc::clone(service);
    let tool = FunctionTool::builder()
        .name(name)
        .description(description)
        .schema(generate_schema::<NoParams>())
        .handler(move |_: NoParams| op(Arc::clone(&service)))
        .build()?;
    Ok(Arc::new(tool))
}

/// All memory tools, in a stable order.
pub fn memory_tools(service: Arc<MemoryService>) -> Result<Vec<Arc<dyn Tool>>> {
    let s = &service;
    Ok(vec![
        memory_tool(
            s,
            "add_memory",
            "Store a piece of text as a memory and return its id. Reusing an id replaces that memory.",
            |svc, req: AddMemoryRequest| async move { svc.add(req).await },
        )?,
        memory_tool(
            s,
            "recall_memory",
            "Return the texts of the memories most relevant to a query.",
            |svc, req: RecallRequest| async move { svc.recall(req).await },
        )?,
        memory_tool(
            s,
            "recall_memory_with_distance",
            "Return the most relevant memories as [text, distance] pairs. Smaller distances are closer.",
            |svc, req: RecallRequest| async move { svc.recall_with_distance(req).await },
        )?,
        memory_tool(
            s,
            "recall_memory_hybrid",
            "Recall memories for a query, keeping only those that contain a keyword.",
            |svc, req: HybridRecallRequest| async move { svc.recall_hybrid(req).await },
        )?,
        memory_tool(
            s,
            "delete_memory",
            "Delete a memory by id. Succeeds even if the id does not exist.",
            |svc, req: MemoryIdRequest| async move { svc.delete(req).await },
        )?,
        memory_tool(
            s,
            "update_memory_metadata",
            "Replace the metadata of an existing memory without changing its text or embedding.",
            |svc, req: UpdateMetadataRequest| async move { svc.update_metadata(req).await },
        )?,
        memory_tool(
            s,
            "get_memory_by_id",
            "Return the text of a memory, or an empty string if the id is unknown.",
            |svc, req: MemoryIdRequest| async move { svc.get_by_id(req).await },
        )?,
        memory_tool(
            s,
            "check_memory",
            "Check whether any memory relates to a topic.",
            |svc, req: CheckMemoryRequest| async move { svc.check(req).await },
        )?,
        memory_tool(
            s,
            "summarize_memory",
            "Summarize the memories most relevant to a query. Returns an empty string when nothing is found.",
            |svc, req: SummarizeMemoryRequest| async move { svc.summarize_memory(req).await },
        )?,
        memory_tool(
            s,
            "summarize_collection",
            "Summarize every memory in a collection, optionally guided by a query.",
            |svc, req: SummarizeCollectionRequest| async move {
                svc.summarize_collection(req).await
            },
        )?,
        memory_tool(
            s,
            "list_collection_ids",
            "List the ids of all memories in a collection.",
            |svc, req: CollectionRequest| async move { svc.list_collection_ids(req).await },
        )?,
        bare_tool(
            s,
            "list_collections",
            "List all collection names. Requires grant_privilege first.",
            |svc| async move { svc.list_collections().await },
        )?,
        memory_tool(
            s,
            "delete_collection",
            "Delete a collection and every memory in it. Requires grant_privilege first.",
            |svc, req: CollectionRequest| async move { svc.delete_collection(req).await },
        )?,
        bare_tool(
            s,
            "grant_privilege",
            "Allow the next privileged operation (list_collections or delete_collection).",
            |svc| async move { Ok::<_, Error>(svc.grant_privilege()) },
        )?,
    ])
}
