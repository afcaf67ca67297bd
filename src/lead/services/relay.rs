//! Dispatch of inbound lead change events.

use crate::lead::{
    domain::{
        ChangeOperation, ContactSnapshot, LeadChangeEvent, LeadSnapshot, LeadSyncResult,
        RemoteTaskSummary, SyncOutcome,
    },
    ports::{ContactDirectory, RemoteTaskClient, RoutingSource},
    services::SyncOrchestrator,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the relay did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayReport {
    /// The event was not a lead change this relay handles.
    Ignored {
        /// Why the event was skipped.
        reason: String,
    },
    /// An insert was relayed; `None` means it was not mirrored remotely.
    Created(Option<RemoteTaskSummary>),
    /// An update was relayed; `None` means it was not mirrored remotely.
    Updated(Option<RemoteTaskSummary>),
    /// A delete was relayed; `None` means the integration is disabled.
    Deleted(Option<SyncOutcome>),
}

/// Routes change events to the sync orchestrator.
pub struct LeadChangeRelay<S, C, K, D>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
    D: ContactDirectory,
{
    orchestrator: SyncOrchestrator<S, C, K>,
    directory: Arc<D>,
}

impl<S, C, K, D> LeadChangeRelay<S, C, K, D>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
    D: ContactDirectory,
{
    /// Creates a relay.
    #[must_use]
    pub const fn new(orchestrator: SyncOrchestrator<S, C, K>, directory: Arc<D>) -> Self {
        Self {
            orchestrator,
            directory,
        }
    }

    /// Returns the wrapped orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &SyncOrchestrator<S, C, K> {
        &self.orchestrator
    }

    /// Handles one change event.
    ///
    /// Events for other entities and unknown operations are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSyncError::InvalidEvent`](crate::lead::domain::LeadSyncError::InvalidEvent)
    /// when the record cannot be converted, and create/update failures from
    /// the orchestrator.
    pub async fn handle(&self, event: LeadChangeEvent) -> LeadSyncResult<RelayReport> {
        if !event.is_lead_event() {
            debug!(entity = %event.entity, "ignoring change event for another entity");
            return Ok(ignored(format!("entity '{}' is not relayed", event.entity)));
        }

        match event.operation {
            ChangeOperation::Insert => {
                let Some(record) = event.record else {
                    return Ok(ignored("insert event without record".to_owned()));
                };
                let lead = LeadSnapshot::try_from(record)?;
                let contact = self.contact_for(&lead, event.contact.map(Into::into)).await;
                let created = self.orchestrator.sync_create(&lead, contact.as_ref()).await?;
                Ok(RelayReport::Created(created))
            }
            ChangeOperation::Update => {
                let Some(record) = event.record else {
                    return Ok(ignored("update event without record".to_owned()));
                };
                let lead = LeadSnapshot::try_from(record)?;
                let contact = self.contact_for(&lead, event.contact.map(Into::into)).await;
                let updated = self.orchestrator.sync_update(&lead, contact.as_ref()).await?;
                Ok(RelayReport::Updated(updated))
            }
            ChangeOperation::Delete => {
                let Some(record) = event.old_record.or(event.record) else {
                    return Ok(ignored("delete event without record".to_owned()));
                };
                let lead = LeadSnapshot::try_from(record)?;
                Ok(RelayReport::Deleted(self.orchestrator.sync_delete(&lead).await))
            }
            ChangeOperation::Unknown => {
                debug!("ignoring change event with unknown operation");
                Ok(ignored("unknown operation".to_owned()))
            }
        }
    }

    async fn contact_for(
        &self,
        lead: &LeadSnapshot,
        embedded: Option<ContactSnapshot>,
    ) -> Option<ContactSnapshot> {
        if embedded.is_some() {
            return embedded;
        }
        let contact_id = lead.contact_id()?;
        match self.directory.find_contact(contact_id).await {
            Ok(contact) => contact,
            Err(err) => {
                warn!(
                    contact_id = %contact_id,
                    error = %err,
                    "contact lookup failed; continuing without contact details"
                );
                None
            }
        }
    }
}

fn ignored(reason: String) -> RelayReport {
    RelayReport::Ignored { reason }
}
