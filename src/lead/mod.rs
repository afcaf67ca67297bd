//! Lead-to-task synchronisation.
//!
//! Leads are mirrored as tasks in the list configured for their category.
//! Creates and updates write a rendered draft; deletes locate the task by
//! the lead number custom field, retrying once with freshly resolved
//! routing and then searching every other configured list. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
