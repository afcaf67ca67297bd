//! Routing configuration source port.

use crate::lead::domain::{ConfigurationFault, RoutingTable};
use thiserror::Error;

/// Result type for routing source operations.
pub type RoutingSourceResult<T> = Result<T, RoutingSourceError>;

/// Supplies the current routing table.
///
/// Sources are consulted on every resolution, so an implementation that
/// re-reads its backing store picks up edits without a restart.
pub trait RoutingSource: Send + Sync {
    /// Loads the current routing table.
    ///
    /// An empty table means routing is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingSourceError`] when the backing store cannot be read.
    fn load(&self) -> RoutingSourceResult<RoutingTable>;
}

impl RoutingSource for RoutingTable {
    fn load(&self) -> RoutingSourceResult<RoutingTable> {
        Ok(self.clone())
    }
}

/// Errors returned by routing sources.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingSourceError {
    /// The backing store could not be read.
    #[error("failed to read routing configuration from {origin}: {reason}")]
    Unreadable {
        /// Where the source tried to read from.
        origin: String,
        /// Underlying failure.
        reason: String,
    },
}

impl From<RoutingSourceError> for ConfigurationFault {
    fn from(err: RoutingSourceError) -> Self {
        Self::Unreadable(err.to_string())
    }
}
