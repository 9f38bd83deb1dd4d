//! Storage Boundary
//!
//! Repository implementations wrap their backend failures in
//! [`StorageError`]; the service layer never interprets the cause, it only
//! propagates it.

use thiserror::Error;

/// Opaque error from a storage collaborator.
#[derive(Debug, Error)]
#[error("storage error")]
pub struct StorageError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl StorageError {
    /// Wrap a backend error.
    #[must_use]
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}
