//! # zmem MCP server
//!
//! Exposes the memory toolset over the Model Context Protocol.

pub mod server;

pub use server::{MemoryMcpServer, SERVER_NAME, to_mcp_error};

use std::path::Path;
use std::sync::Arc;
use zmem_core::{ZConfig, ZConfigExt};
use zmem_memory::MemoryService;
use zmem_store::LocalVectorStore;
use zmem_tool::MemoryToolset;

/// Wire the store, model provider and service together from configuration.
///
/// `data_dir` overrides the configured store directory.
pub async fn build_server(
    config: &ZConfig,
    data_dir: Option<&Path>,
) -> anyhow::Result<MemoryMcpServer> {
    let data_dir = data_dir.unwrap_or(config.store.data_dir.as_path());
    tracing::info!(data_dir = %data_dir.display(), "Opening memory store");

    let store = Arc::new(LocalVectorStore::open(data_dir).await?);
    let provider = config.create_provider()?;

    let service = MemoryService::new(store, provider)
        .with_default_collection(config.store.default_collection.clone())
        .with_summary_model(config.model.generation_model.clone());

    let toolset = MemoryToolset::new(Arc::new(service))?;
    tracing::debug!(tools = toolset.list().len(), "Registered memory tools");

    Ok(MemoryMcpServer::new(Arc::new(toolset)))
}
