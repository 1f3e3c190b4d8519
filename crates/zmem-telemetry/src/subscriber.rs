//! Subscriber setup

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when neither `RUST_LOG` nor the configuration sets one
pub const DEFAULT_FILTER: &str = "info,zmem=debug";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Logging options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive; `RUST_LOG` takes precedence when set
    pub filter: Option<String>,

    /// Emit one JSON object per line
    pub json: bool,
}

impl TelemetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the env filter: `RUST_LOG`, then the configured directive, then [`DEFAULT_FILTER`]
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }

        let directive = self
            .filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FILTER);

        EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
            directive: directive.to_string(),
            reason: e.to_string(),
        })
    }
}

/// The env filter to install, falling back to [`DEFAULT_FILTER`] when the
/// configured directive does not parse. The rejected directive is returned
/// alongside so it can be reported once logging is up.
fn filter_or_default(config: &TelemetryConfig) -> (EnvFilter, Option<TelemetryError>) {
    match config.env_filter() {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr. An invalid filter directive falls back to
/// [`DEFAULT_FILTER`] with a warning. Fails if a global subscriber is already
/// set.
///
/// # Example
///
/// ```rust,no_run
/// use zmem_telemetry::{TelemetryConfig, init_telemetry};
///
/// init_telemetry(&TelemetryConfig::new().with_json(true)).ok();
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let (filter, rejected) = filter_or_default(config);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    if let Some(e) = rejected {
        tracing::warn!(error = %e, fallback = DEFAULT_FILTER, "Ignoring log filter");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TelemetryConfig::new()
            .with_filter("warn,zmem_memory=trace")
            .with_json(true);

        assert_eq!(config.filter.as_deref(), Some("warn,zmem_memory=trace"));
        assert!(config.json);
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        // RUST_LOG would shadow the configured directive
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        let config = TelemetryConfig::new().with_filter("zmem=notalevel");
        let err = config.env_filter().unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_invalid_filter_falls_back_to_default() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        let config = TelemetryConfig::new().with_filter("zmem=notalevel");
        let (filter, rejected) = filter_or_default(&config);

        assert!(matches!(
            rejected,
            Some(TelemetryError::InvalidFilter { ref directive, .. }) if directive == "zmem=notalevel"
        ));
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());

        let (_, rejected) = filter_or_default(&TelemetryConfig::new().with_filter("warn"));
        assert!(rejected.is_none());
    }

    #[test]
    fn test_blank_filter_uses_default() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        let config = TelemetryConfig::new().with_filter("  ");
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig::new();
        let _ = init_telemetry(&config);
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::Init(_))
        ));
    }
}
