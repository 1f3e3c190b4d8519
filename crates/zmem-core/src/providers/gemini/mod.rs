//! Google Gemini provider
//!
//! Supports two capabilities:
//! - Text generation: gemini-2.5-pro-exp-03-25 by default
//! - Embeddings: embedding-001 by default, with task type hints

pub mod auth;
pub mod provider;
pub mod types;

pub use auth::GeminiAuth;
pub use provider::GeminiProvider;

use crate::config::ModelConfig;

/// Gemini configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// Model name for text generation
    pub model: String,
    /// Base URL for API requests
    pub base_url: String,
    /// Embedding model name
    pub embedding_model: String,
}

impl GeminiConfig {
    /// Configuration taken from the `[model]` section of `ZConfig`
    pub fn from_model_config(model: &ModelConfig) -> Self {
        Self {
            model: model.generation_model.clone(),
            base_url: model.base_url.trim_end_matches('/').to_string(),
            embedding_model: model.embedding_model.clone(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from_model_config(&ModelConfig::default())
    }
}

/// Builder for GeminiProvider
pub struct GeminiBuilder {
    auth: Option<GeminiAuth>,
    config: Option<GeminiConfig>,
}

impl GeminiBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            auth: None,
            config: None,
        }
    }

    /// Set API key authentication
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth = Some(GeminiAuth::ApiKey(api_key.into()));
        self
    }

    /// Set custom configuration
    pub fn with_config(mut self, config: GeminiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the provider
    pub fn build(self) -> crate::Result<GeminiProvider> {
        let auth = self
            .auth
            .ok_or_else(|| crate::Error::config_error("Authentication is required"))?;
        let config = self.config.unwrap_or_default();

        Ok(GeminiProvider::new(auth, config))
    }
}

impl Default for GeminiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
