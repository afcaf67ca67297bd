//! Application services for lead-to-task synchronisation.

mod fields;
mod locator;
mod orchestrator;
mod relay;
mod routing;

pub use fields::FieldAssignmentBuilder;
pub use locator::{ListMatch, TaskLocator};
pub use orchestrator::SyncOrchestrator;
pub use relay::{LeadChangeRelay, RelayReport};
pub use routing::RoutingResolver;
