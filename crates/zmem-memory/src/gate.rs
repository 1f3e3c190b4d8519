//! Single-use privilege gate
//!
//! A grant admits exactly one privileged operation. Consuming the grant is an
//! atomic `true -> false` swap that yields a [`PrivilegeToken`]; privileged
//! code paths take the token as an argument, so they cannot run without one.

use std::sync::atomic::{AtomicBool, Ordering};
use zmem_core::{Error, Result};

/// Proof that a grant was consumed for one operation
///
/// Only [`PrivilegeGate::consume`] can create one.
#[derive(Debug)]
pub struct PrivilegeToken {
    operation: String,
}

impl PrivilegeToken {
    /// Operation the grant was consumed for
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Gate state owned by one service instance
#[derive(Debug, Default)]
pub struct PrivilegeGate {
    granted: AtomicBool,
}

impl PrivilegeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant privilege for the next privileged operation. Idempotent.
    pub fn grant(&self) -> bool {
        self.granted.store(true, Ordering::SeqCst);
        tracing::info!("Temporary privilege granted for next sensitive operation");
        true
    }

    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    /// Take the grant for `operation`
    ///
    /// The grant is gone once this returns, whatever the operation does next.
    pub fn consume(&self, operation: &str) -> Result<PrivilegeToken> {
        match self
            .granted
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                tracing::debug!(operation = %operation, "Privilege consumed");
                Ok(PrivilegeToken {
                    operation: operation.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(
                    operation = %operation,
                    "Attempted sensitive operation without privilege"
                );
                Err(Error::privilege(format!(
                    "Operation '{}' requires privilege. Use 'grant_privilege' first.",
                    operation
                )))
            }
        }
    }
}
