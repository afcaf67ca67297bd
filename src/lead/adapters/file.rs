//! Routing source backed by the relay configuration file.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::config::RelayConfig;
use crate::lead::{
    domain::RoutingTable,
    ports::{RoutingSource, RoutingSourceError, RoutingSourceResult},
};

/// Reads the `routing` section of a JSON configuration file on every load.
///
/// Edits to the file are picked up by the next resolution without a
/// restart.
#[derive(Debug, Clone)]
pub struct JsonFileRoutingSource {
    path: Utf8PathBuf,
}

impl JsonFileRoutingSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl RoutingSource for JsonFileRoutingSource {
    fn load(&self) -> RoutingSourceResult<RoutingTable> {
        let config = RelayConfig::load(&self.path).map_err(|err| RoutingSourceError::Unreadable {
            origin: self.path.to_string(),
            reason: err.to_string(),
        })?;
        debug!(
            path = %self.path,
            categories = config.routing.categories().count(),
            "loaded routing table"
        );
        Ok(config.routing)
    }
}
