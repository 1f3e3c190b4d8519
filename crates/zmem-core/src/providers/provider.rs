//! Provider trait and metadata definitions
//!
//! Defines the unified Provider trait that the memory layer talks to for
//! embeddings and text generation.

use crate::{Error, LLMRequest, LLMResponse, Result, capabilities::*};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider capability enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Text generation (LLM completion)
    TextGeneration,
    /// Text to vector embeddings
    Embedding,
}

/// Provider metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Provider identifier (e.g., "gemini")
    pub name: String,
    /// Display name (e.g., "Google Gemini")
    pub display_name: String,
    /// Supported capabilities
    pub capabilities: Vec<Capability>,
    /// Available models
    pub models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
    /// Display name
    pub display_name: String,
    /// Capabilities this model supports
    pub capabilities: Vec<Capability>,
    /// Embedding dimensions (if applicable)
    pub embedding_dimensions: Option<usize>,
}

/// Unified provider trait
///
/// Methods have default implementations that return errors, allowing
/// providers to opt-in to only the capabilities they support.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// Check if provider supports a capability
    fn supports(&self, capability: Capability) -> bool {
        self.metadata().capabilities.contains(&capability)
    }

    // ===== Text Generation Capability =====

    /// Generate text content for a single request (no streaming)
    async fn generate_content(&self, _request: LLMRequest) -> Result<LLMResponse> {
        Err(Error::upstream(
            "Provider does not support text generation capability",
        ))
    }

    // ===== Embedding Capability =====

    /// Embed one text, passing the intended use as a hint to the model
    async fn embed_content(&self, _text: String, _task_type: TaskType) -> Result<EmbeddingVector> {
        Err(Error::upstream(
            "Provider does not support embedding capability",
        ))
    }

    /// Get embedding dimensions for this provider
    ///
    /// Returns None if provider doesn't support embeddings
    fn embedding_dimensions(&self) -> Option<usize> {
        None
    }
}
