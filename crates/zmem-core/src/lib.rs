//! Core traits and types for zmem
//!
//! This crate provides the shared foundation of the memory service: the error
//! type and its envelope, configuration, the model provider abstraction with
//! its Gemini implementation, and the tool trait.

pub mod capabilities;
pub mod config;
pub mod content;
pub mod envelope;
pub mod error;
pub mod extensions;
pub mod providers;
pub mod testing;
pub mod traits;

// Re-exports
pub use capabilities::{EmbeddingVector, TaskType};
pub use config::{
    AuthConfig, DEFAULT_COLLECTION_NAME, DEFAULT_DATA_DIR, ModelConfig, ObservabilityConfig,
    StoreConfig, ZConfig,
};
pub use content::{Content, Part};
pub use envelope::{ErrorEnvelope, intercept};
pub use error::{Error, ErrorKind, Result};
pub use extensions::ZConfigExt;
pub use providers::{Capability, ModelInfo, Provider, ProviderMetadata};
pub use traits::{LLMRequest, LLMResponse, Tool, ToolContext, ToolResponse};
