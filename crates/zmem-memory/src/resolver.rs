//! Collection resolution

use std::sync::Arc;
use zmem_core::{Error, Result};
use zmem_store::{Collection, VectorStore};

/// Maps collection names to store handles, creating collections on first use
#[derive(Clone)]
pub struct CollectionResolver {
    store: Arc<dyn VectorStore>,
}

impl CollectionResolver {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Get-or-create the named collection
    pub async fn resolve(&self, name: &str) -> Result<Arc<dyn Collection>> {
        if name.trim().is_empty() {
            return Err(Error::validation("Collection name cannot be empty."));
        }
        self.store.get_or_create_collection(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmem_core::ErrorKind;
    use zmem_store::LocalVectorStore;

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let store = Arc::new(LocalVectorStore::in_memory());
        let resolver = CollectionResolver::new(store.clone());

        let first = resolver.resolve("notes").await.unwrap();
        let second = resolver.resolve("notes").await.unwrap();

        assert_eq!(first.name(), second.name());
        assert_eq!(store.list_collections().await.unwrap(), vec!["notes"]);
    }

    #[tokio::test]
    async fn test_empty_name_creates_nothing() {
        let store = Arc::new(LocalVectorStore::in_memory());
        let resolver = CollectionResolver::new(store.clone());

        let err = resolver.resolve("  ").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(store.list_collections().await.unwrap().is_empty());
    }
}
