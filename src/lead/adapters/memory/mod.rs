//! In-memory adapter implementations for testing.
//!
//! These adapters are thread-safe and need no network access, which makes
//! them suitable for unit and behaviour tests.

mod contact_directory;
mod routing;
mod task_client;

pub use contact_directory::InMemoryContactDirectory;
pub use routing::SharedRoutingTable;
pub use task_client::{InMemoryRemoteTaskClient, RemoteCall};
