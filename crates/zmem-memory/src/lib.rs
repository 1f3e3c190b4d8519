//! # zmem Memory Service
//!
//! Semantic memory for agents: store text as addressable memories, recall
//! the most relevant ones for a query, summarize them, and manage
//! collections behind a single-use privilege gate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zmem_core::{ZConfig, ZConfigExt};
//! use zmem_memory::{AddMemoryRequest, MemoryService, RecallRequest};
//! use zmem_store::LocalVectorStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ZConfig::load()?;
//! let store = Arc::new(LocalVectorStore::open(&config.store.data_dir).await?);
//! let service = MemoryService::new(store, config.create_provider()?);
//!
//! let id = service.add(AddMemoryRequest::new("The deploy key rotates monthly")).await?;
//! let texts = service.recall(RecallRequest::new("deploy key")).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedder;
pub mod gate;
pub mod metadata;
pub mod resolver;
pub mod retrieval;
pub mod service;
pub mod summarize;
pub mod types;

pub use embedder::Embedder;
pub use gate::{PrivilegeGate, PrivilegeToken};
pub use metadata::{MemoryMetadata, ORIGINAL_TEXT_KEY};
pub use resolver::CollectionResolver;
pub use retrieval::{Recalled, SearchOptions};
pub use service::MemoryService;
pub use summarize::{CONTEXT_SEPARATOR, Summarizer};
pub use types::*;
