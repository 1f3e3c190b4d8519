//! Extension traits for zmem core types

use crate::{
    Result, ZConfig,
    providers::{GeminiBuilder, GeminiConfig, Provider},
};
use std::sync::Arc;

/// Extension trait for ZConfig to simplify provider creation
///
/// # Example
/// ```no_run
/// use zmem_core::{ZConfig, ZConfigExt};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ZConfig::load()?;
/// let provider = config.create_provider()?;
/// # Ok(())
/// # }
/// ```
pub trait ZConfigExt {
    /// Create the model provider described by the `[auth]` and `[model]` sections
    ///
    /// Fails with a configuration error when no API key is set.
    fn create_provider(&self) -> Result<Arc<dyn Provider>>;
}

impl ZConfigExt for ZConfig {
    fn create_provider(&self) -> Result<Arc<dyn Provider>> {
        let provider = GeminiBuilder::new()
            .with_api_key(self.api_key()?)
            .with_config(GeminiConfig::from_model_config(&self.model))
            .build()?;

        Ok(Arc::new(provider))
    }
}
