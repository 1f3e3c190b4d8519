//! Configuration management for zmem
//!
//! Loads configuration with priority:
//! 1. config.toml (or specified config file), with `${VAR}` references resolved
//! 2. Environment variables (fallback, `.env` is honored)
//! 3. Defaults
//!
//! The Gemini API key is the only required setting.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the store directory
pub const DATA_DIR_ENV: &str = "ZMEM_DATA_DIR";
/// Environment variable overriding the default collection name
pub const DEFAULT_COLLECTION_ENV: &str = "ZMEM_DEFAULT_COLLECTION";

/// Collection used whenever a caller omits one
pub const DEFAULT_COLLECTION_NAME: &str = "agent_memory";
/// Store directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "memory_db_data";

/// zmem configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZConfig {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Model provider credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// API key (can reference env var with ${VAR_NAME})
    pub api_key: Option<String>,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Text generation model used for summaries
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Base URL for model API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_collection")]
    pub default_collection: String,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Filter directive, e.g. "info,zmem_memory=debug"; `RUST_LOG` wins when set
    pub log_filter: Option<String>,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_collection: default_collection(),
        }
    }
}

impl ZConfig {
    /// Load configuration from config.toml (if any) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file.
    ///
    /// Without a path, config.toml is searched for in the current directory
    /// and its parents; a missing file is not an error. The API key must end
    /// up set either way.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(config_path) => {
                tracing::debug!("Loading configuration from: {:?}", config_path);

                let contents = fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

                Self::from_toml_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
            }
            None => {
                tracing::debug!("No config.toml found, using environment and defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        config.api_key()?;

        Ok(config)
    }

    /// Parse a TOML document and resolve `${VAR}` references in it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: ZConfig = toml::from_str(contents)?;
        config.resolve_env_vars();
        Ok(config)
    }

    /// Find config.toml by searching current directory and parents
    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        if let Some(ref key) = self.auth.api_key {
            self.auth.api_key = Self::resolve_env_var(key);
        }
        if let Some(ref filter) = self.observability.log_filter {
            self.observability.log_filter = Self::resolve_env_var(filter);
        }
    }

    /// Resolve a single ${VAR_NAME} reference
    pub fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    /// Fill unset values from the environment.
    ///
    /// The lookup is injected so the precedence rules can be tested without
    /// touching the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let has_key = self
            .auth
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            self.auth.api_key = lookup(API_KEY_ENV);
        }

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.store.data_dir = PathBuf::from(dir);
        }

        if let Some(name) = lookup(DEFAULT_COLLECTION_ENV).filter(|v| !v.trim().is_empty()) {
            self.store.default_collection = name;
        }
    }

    /// Get API key with clear error message
    pub fn api_key(&self) -> crate::Result<String> {
        self.auth
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                crate::Error::config_error(format!(
                    "{API_KEY_ENV} environment variable not set or empty. Configure it in config.toml:\n\
                    [auth]\n\
                    api_key = \"${{{API_KEY_ENV}}}\"\n\
                    \n\
                    Or set environment variable:\n\
                    export {API_KEY_ENV}=\"your-key\""
                ))
            })
    }

    /// Create test-friendly defaults (no real API key required)
    pub fn test_defaults() -> Self {
        Self {
            auth: AuthConfig {
                api_key: Some("test-api-key".to_string()),
            },
            model: ModelConfig::default(),
            store: StoreConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_embedding_model() -> String {
    "embedding-001".to_string()
}

fn default_generation_model() -> String {
    "gemini-2.5-pro-exp-03-25".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_collection() -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}
