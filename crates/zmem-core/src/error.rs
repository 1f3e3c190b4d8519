use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Privilege(String),

    #[error("Model provider request failed: {0}")]
    Upstream(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of an [`Error`], carried across the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Privilege,
    Upstream,
    Store,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Privilege => "PrivilegeError",
            ErrorKind::Upstream => "UpstreamError",
            ErrorKind::Store => "StoreError",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Helper for creating validation errors
    ///
    /// # Example
    /// ```
    /// use zmem_core::Error;
    /// let err = Error::validation("Query cannot be empty.");
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn privilege(msg: impl Into<String>) -> Self {
        Error::Privilege(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::Upstream(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Helper for creating configuration errors
    ///
    /// # Example
    /// ```
    /// use zmem_core::Error;
    /// let err = Error::config_error("GEMINI_API_KEY is not set");
    /// ```
    pub fn config_error(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Helper for creating general errors with a message
    pub fn message(msg: impl Into<String>) -> Self {
        Error::Other(anyhow::anyhow!("{}", msg.into()))
    }

    /// Returns the kind this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Privilege(_) => ErrorKind::Privilege,
            Error::Upstream(_) => ErrorKind::Upstream,
            Error::Store(_) => ErrorKind::Store,
            Error::Config(_)
            | Error::SerializationError(_)
            | Error::IoError(_)
            | Error::Other(_) => ErrorKind::Internal,
        }
    }
}
