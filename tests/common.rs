//! Common test utilities and helpers

#![allow(dead_code)]

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use zmem_core::ErrorEnvelope;
use zmem_core::testing::MockProvider;
use zmem_memory::MemoryService;
use zmem_store::LocalVectorStore;
use zmem_tool::MemoryToolset;

/// A memory service wired to a deterministic provider, plus its toolset
pub struct Harness {
    pub service: Arc<MemoryService>,
    pub toolset: MemoryToolset,
    pub provider: Arc<MockProvider>,
    pub store: Arc<LocalVectorStore>,
}

impl Harness {
    pub async fn call(&self, tool: &str, params: Value) -> Result<Value, ErrorEnvelope> {
        self.toolset.call(tool, params).await
    }
}

/// Provider with fixed two-dimensional vectors for the fruit fixtures.
///
/// "apple" sits next to "apple pie" and far from "banana bread".
pub fn fruit_provider() -> MockProvider {
    MockProvider::with_dimensions(2)
        .with_vector("apple pie", vec![1.0, 0.0])
        .with_vector("banana bread", vec![0.0, 1.0])
        .with_vector("apple", vec![0.9, 0.1])
        .with_vector("banana", vec![0.1, 0.9])
}

fn build(store: Arc<LocalVectorStore>) -> Harness {
    let provider = Arc::new(fruit_provider());
    let service = Arc::new(MemoryService::new(store.clone(), provider.clone()));
    let toolset = MemoryToolset::new(service.clone()).expect("memory tools");

    Harness {
        service,
        toolset,
        provider,
        store,
    }
}

/// Harness over an in-memory store
pub fn harness() -> Harness {
    build(Arc::new(LocalVectorStore::in_memory()))
}

/// Harness over a store persisted in `dir`
pub async fn harness_at(dir: &Path) -> Harness {
    let store = LocalVectorStore::open(dir).await.expect("open store");
    build(Arc::new(store))
}
