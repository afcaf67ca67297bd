//! Domain model for lead-to-task synchronisation.
//!
//! Lead and contact snapshots, routing configuration, remote task values and
//! sync outcomes live here. Nothing in this module performs I/O.

mod error;
mod event;
mod ids;
mod lead;
mod outcome;
mod remote;
mod routing;
mod settings;

pub use error::{
    ConfigurationFault, LeadDomainError, LeadSyncError, LeadSyncErrorKind, LeadSyncResult,
    TransportFaultKind,
};
pub use event::{ChangeOperation, ContactRecord, LEADS_ENTITY, LeadChangeEvent, LeadRecord};
pub use ids::{ContactId, FieldId, LeadId, LeadNumber, ListId, RemoteTaskId, sanitize_identifier};
pub use lead::{ContactSnapshot, LeadCategory, LeadSnapshot};
pub use outcome::{SyncAttempt, SyncOutcome, SyncStatus};
pub use remote::{FieldAssignment, RemoteFieldValue, RemoteTaskSummary, TaskDraft, TaskPriority};
pub use routing::{LogicalField, RoutingEntry, RoutingRule, RoutingTable};
pub use settings::IntegrationSettings;
