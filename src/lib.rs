//! Lead relay: mirrors CRM leads as tasks in a remote project tracker.
//!
//! Lead change events (insert, update, delete) are routed by lead category
//! to a remote task list, rendered into a task draft and applied through a
//! remote task client. Deletes locate the mirrored task by its lead number
//! and report a structured outcome.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the remote service, contact
//!   lookup and routing configuration
//! - **Adapters**: Concrete implementations of ports (HTTP, file, in-memory)
//!
//! # Modules
//!
//! - [`lead`]: Lead-to-task synchronisation
//! - [`config`]: Configuration file loading and environment overrides
//! - [`observability`]: Logging initialisation and span helpers

pub mod config;
pub mod lead;
pub mod observability;
