//! Port contracts for lead synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by the sync
//! services: the remote task service, contact lookup and routing
//! configuration.

pub mod contact_directory;
pub mod routing_source;
pub mod task_client;

pub use contact_directory::{ContactDirectory, ContactDirectoryError, ContactDirectoryResult};
pub use routing_source::{RoutingSource, RoutingSourceError, RoutingSourceResult};
pub use task_client::{RemoteTaskClient, RemoteTaskClientError, RemoteTaskClientResult};
