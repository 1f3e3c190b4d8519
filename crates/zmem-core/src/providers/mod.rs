//! Model provider implementations
//!
//! Providers implement the `Provider` trait, opting in to the capabilities
//! they support. The memory layer needs two of them: embeddings for storing
//! and searching, and text generation for summaries.
//!
//! # Example
//!
//! ```ignore
//! use zmem_core::{Capability, TaskType, ZConfig, ZConfigExt};
//!
//! let config = ZConfig::load()?;
//! let provider = config.create_provider()?;
//!
//! if provider.supports(Capability::Embedding) {
//!     let vector = provider
//!         .embed_content("Hello".into(), TaskType::RetrievalQuery)
//!         .await?;
//! }
//! ```

pub mod provider;

pub mod gemini;

#[cfg(test)]
mod provider_tests;

pub use provider::{Capability, ModelInfo, Provider, ProviderMetadata};

pub use gemini::{GeminiAuth, GeminiBuilder, GeminiConfig, GeminiProvider};
