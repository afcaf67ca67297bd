//! Contact lookup port.

use crate::lead::domain::{ContactId, ContactSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for contact directory operations.
pub type ContactDirectoryResult<T> = Result<T, ContactDirectoryError>;

/// Read access to stored contacts.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Finds a contact by identifier.
    ///
    /// Returns `None` when the contact does not exist.
    async fn find_contact(&self, id: ContactId) -> ContactDirectoryResult<Option<ContactSnapshot>>;
}

/// Errors returned by contact directory implementations.
#[derive(Debug, Clone, Error)]
pub enum ContactDirectoryError {
    /// Persistence-layer failure.
    #[error("contact lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContactDirectoryError {
    /// Wraps a persistence error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
