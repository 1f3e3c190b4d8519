//! Vector store abstraction for zmem
//!
//! The memory layer talks to a [`VectorStore`] and the [`Collection`] handles
//! it hands out; it never searches vectors itself. [`LocalVectorStore`] is the
//! bundled implementation, keeping collections in memory and optionally
//! persisting each one as a JSON file.

pub mod filter;
pub mod local;
pub mod types;

pub use filter::{Comparison, Filter, Scalar};
pub use local::LocalVectorStore;
pub use types::{GetRequest, Include, Match, Metadata, QueryRequest, StoredRecord};

use async_trait::async_trait;
use std::sync::Arc;
use zmem_core::Result;

/// A set of named collections
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return the named collection, creating it empty if needed
    async fn get_or_create_collection(&self, name: &str) -> Result<Arc<dyn Collection>>;

    /// Return the named collection if it exists
    async fn get_collection(&self, name: &str) -> Result<Option<Arc<dyn Collection>>>;

    /// Drop a collection and all of its records
    ///
    /// Fails with a not-found error when the collection does not exist.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Names of all collections, in no particular order
    async fn list_collections(&self) -> Result<Vec<String>>;
}

/// Records sharing one embedding dimensionality
#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    /// Insert records, replacing any with the same id
    async fn upsert(&self, records: Vec<StoredRecord>) -> Result<()>;

    /// Replace the embedding and/or metadata of an existing record
    ///
    /// Fails with a not-found error when `id` is absent.
    async fn update(
        &self,
        id: &str,
        embedding: Option<Vec<f32>>,
        metadata: Option<Metadata>,
    ) -> Result<()>;

    /// Nearest records to the query embedding, closest first
    async fn query(&self, request: QueryRequest) -> Result<Vec<Match>>;

    /// Records selected by id, in store order
    async fn get(&self, request: GetRequest) -> Result<Vec<Match>>;

    /// Remove records; ids that do not exist are ignored
    async fn delete(&self, ids: &[String]) -> Result<()>;

    async fn count(&self) -> Result<usize>;
}
