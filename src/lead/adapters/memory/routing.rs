//! Routing table that can be swapped while services hold it.

use std::sync::{Arc, RwLock};

use crate::lead::{
    domain::RoutingTable,
    ports::{RoutingSource, RoutingSourceError, RoutingSourceResult},
};

/// Shared, replaceable routing table.
///
/// Every `load` returns the table as it is at that moment, so a
/// [`replace`](Self::replace) between two resolutions is observed by the
/// second one.
#[derive(Debug, Clone, Default)]
pub struct SharedRoutingTable {
    table: Arc<RwLock<RoutingTable>>,
}

impl SharedRoutingTable {
    /// Wraps an initial table.
    #[must_use]
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }

    /// Replaces the current table.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingSourceError::Unreadable`] when lock acquisition fails.
    pub fn replace(&self, table: RoutingTable) -> RoutingSourceResult<()> {
        let mut current = self.table.write().map_err(|err| lock_error(&err))?;
        *current = table;
        Ok(())
    }
}

fn lock_error(err: &impl std::fmt::Display) -> RoutingSourceError {
    RoutingSourceError::Unreadable {
        origin: "shared routing table".to_owned(),
        reason: err.to_string(),
    }
}

impl RoutingSource for SharedRoutingTable {
    fn load(&self) -> RoutingSourceResult<RoutingTable> {
        let current = self.table.read().map_err(|err| lock_error(&err))?;
        Ok(current.clone())
    }
}
