//! Uniform failure surface for memory operations
//!
//! Operations return [`crate::Result`] internally. Whatever sits in front of
//! them (the tool dispatcher, the MCP handler) passes each call through
//! [`intercept`], which logs the failure once and converts it into an
//! [`ErrorEnvelope`]. Callers only ever see the envelope.

use crate::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// The single error type presented to callers of memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    operation: String,
    kind: ErrorKind,
    message: String,
}

impl ErrorEnvelope {
    pub fn new(operation: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            kind,
            message: message.into(),
        }
    }

    /// Wrap an internal error, keeping its kind and message.
    pub fn wrap(operation: impl Into<String>, error: &Error) -> Self {
        Self::new(operation, error.kind(), error.to_string())
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}

/// Run an operation and convert any failure into an [`ErrorEnvelope`].
///
/// The failure is logged here with the operation name and error kind; the
/// original message is preserved verbatim in the envelope.
pub async fn intercept<T, F>(operation: &str, fut: F) -> std::result::Result<T, ErrorEnvelope>
where
    F: Future<Output = crate::Result<T>>,
{
    match fut.await {
        Ok(value) => Ok(value),
        Err(err) => {
            let envelope = ErrorEnvelope::wrap(operation, &err);
            tracing::error!(
                operation = %operation,
                kind = %envelope.kind(),
                error = ?err,
                "Error during operation '{}': {}",
                operation,
                err
            );
            Err(envelope)
        }
    }
}
