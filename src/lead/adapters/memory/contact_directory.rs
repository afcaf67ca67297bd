//! In-memory contact directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::lead::{
    domain::{ContactId, ContactSnapshot},
    ports::{ContactDirectory, ContactDirectoryError, ContactDirectoryResult},
};

/// Thread-safe in-memory contact directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactDirectory {
    contacts: Arc<RwLock<HashMap<ContactId, ContactSnapshot>>>,
}

impl InMemoryContactDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a contact.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when lock acquisition fails.
    pub fn insert(&self, contact: ContactSnapshot) -> ContactDirectoryResult<()> {
        let mut contacts = self.contacts.write().map_err(|err| {
            ContactDirectoryError::lookup(std::io::Error::other(err.to_string()))
        })?;
        contacts.insert(contact.id(), contact);
        Ok(())
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn find_contact(&self, id: ContactId) -> ContactDirectoryResult<Option<ContactSnapshot>> {
        let contacts = self.contacts.read().map_err(|err| {
            ContactDirectoryError::lookup(std::io::Error::other(err.to_string()))
        })?;
        Ok(contacts.get(&id).cloned())
    }
}
