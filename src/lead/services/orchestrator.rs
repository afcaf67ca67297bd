//! Create, update and delete orchestration against the remote task service.

use crate::lead::{
    domain::{
        ContactSnapshot, IntegrationSettings, LeadSnapshot, LeadSyncResult, RemoteTaskSummary,
        SyncAttempt, SyncOutcome, SyncStatus,
    },
    ports::{RemoteTaskClient, RoutingSource},
    services::{FieldAssignmentBuilder, RoutingResolver, TaskLocator},
};
use crate::observability::lead_sync_span;
use mockable::Clock;
use std::sync::Arc;
use tracing::{Instrument, error, info, warn};

/// Drives lead synchronisation against the remote task service.
///
/// When the integration is not configured every entry point is a logged
/// no-op returning `None`, so local lead processing never depends on the
/// remote service being available.
pub struct SyncOrchestrator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    settings: IntegrationSettings,
    resolver: RoutingResolver<S>,
    builder: FieldAssignmentBuilder<S>,
    locator: TaskLocator<S, C, K>,
    client: Arc<C>,
}

impl<S, C, K> Clone for SyncOrchestrator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            resolver: self.resolver.clone(),
            builder: self.builder.clone(),
            locator: self.locator.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl<S, C, K> SyncOrchestrator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    /// Creates an orchestrator wiring the resolver, builder and locator over
    /// shared collaborators.
    #[must_use]
    pub fn new(settings: IntegrationSettings, routing: Arc<S>, client: Arc<C>, clock: Arc<K>) -> Self {
        let resolver = RoutingResolver::new(routing);
        let builder = FieldAssignmentBuilder::new(resolver.clone());
        let locator = TaskLocator::new(resolver.clone(), Arc::clone(&client), clock);
        Self {
            settings,
            resolver,
            builder,
            locator,
            client,
        }
    }

    /// Returns `true` when the remote integration is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.settings.is_configured()
    }

    /// Returns the field assignment builder.
    #[must_use]
    pub const fn builder(&self) -> &FieldAssignmentBuilder<S> {
        &self.builder
    }

    /// Returns the task locator.
    #[must_use]
    pub const fn locator(&self) -> &TaskLocator<S, C, K> {
        &self.locator
    }

    /// Mirrors a newly inserted lead as a remote task.
    ///
    /// Returns `Ok(None)` when the integration is disabled.
    ///
    /// # Errors
    ///
    /// Returns configuration, rendering and remote failures unchanged after
    /// logging them.
    pub async fn sync_create(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<Option<RemoteTaskSummary>> {
        if !self.is_enabled() {
            self.log_disabled(SyncAttempt::Create, lead);
            return Ok(None);
        }
        let span = lead_sync_span(SyncAttempt::Create, lead.lead_number());
        let result = self.create(lead, contact).instrument(span).await;
        if let Err(err) = &result {
            error!(
                lead_id = %lead.id(),
                lead_number = %lead.lead_number(),
                kind = ?err.kind(),
                error = %err,
                "failed to create remote task for lead"
            );
        }
        result.map(Some)
    }

    async fn create(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<RemoteTaskSummary> {
        let category = lead.effective_category();
        let rule = self.resolver.resolve(&category)?;
        let draft = self
            .builder
            .build_draft(lead, contact, self.settings.default_priority)?;
        let created = self.client.create_task(rule.list_id(), &draft).await?;
        info!(
            task_id = %created.id,
            list_id = %rule.list_id(),
            category = %category,
            "created remote task for lead"
        );
        Ok(created)
    }

    /// Applies a lead update to its remote task.
    ///
    /// The task is searched in the declared category's list first and then
    /// in every other configured list. Returns `Ok(None)` when the
    /// integration is disabled or no task carries the lead number.
    ///
    /// # Errors
    ///
    /// Returns configuration, rendering and remote failures unchanged after
    /// logging them.
    pub async fn sync_update(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<Option<RemoteTaskSummary>> {
        if !self.is_enabled() {
            self.log_disabled(SyncAttempt::Update, lead);
            return Ok(None);
        }
        let span = lead_sync_span(SyncAttempt::Update, lead.lead_number());
        let result = self.update(lead, contact).instrument(span).await;
        if let Err(err) = &result {
            error!(
                lead_id = %lead.id(),
                lead_number = %lead.lead_number(),
                kind = ?err.kind(),
                error = %err,
                "failed to update remote task for lead"
            );
        }
        result
    }

    async fn update(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<Option<RemoteTaskSummary>> {
        let category = lead.effective_category();
        let lead_number = lead.lead_number();
        let draft = self
            .builder
            .build_draft(lead, contact, self.settings.default_priority)?;

        let located = match self.locator.find_task_id(&category, lead_number).await? {
            Some(found) => Some(found),
            None => self
                .locator
                .find_in_other_lists(&category, lead_number)
                .await?
                .and_then(|matched| matched.chosen().cloned()),
        };

        let Some(task_id) = located else {
            warn!(
                lead_number = %lead_number,
                category = %category,
                "no remote task found for updated lead; nothing mirrored"
            );
            return Ok(None);
        };

        let updated = self.client.update_task(&task_id, &draft).await?;
        info!(task_id = %updated.id, "updated remote task for lead");
        Ok(Some(updated))
    }

    /// Deletes the remote task mirroring a lead.
    ///
    /// Returns `None` when the integration is disabled. Expected failures
    /// such as a missing task are reported through the outcome status.
    pub async fn sync_delete(&self, lead: &LeadSnapshot) -> Option<SyncOutcome> {
        if !self.is_enabled() {
            self.log_disabled(SyncAttempt::Delete, lead);
            return None;
        }
        let span = lead_sync_span(SyncAttempt::Delete, lead.lead_number());
        let outcome = self.locator.locate_for_delete(lead).instrument(span).await;
        match outcome.status {
            SyncStatus::ConfigError | SyncStatus::Error => error!(
                outcome_id = %outcome.id,
                status = %outcome.status,
                diagnosis = %outcome.diagnosis,
                "remote task deletion failed"
            ),
            SyncStatus::Deleted => info!(
                outcome_id = %outcome.id,
                status = %outcome.status,
                task_id = ?outcome.task_id,
                "remote task deletion finished"
            ),
            _ => warn!(
                outcome_id = %outcome.id,
                status = %outcome.status,
                diagnosis = %outcome.diagnosis,
                "remote task deletion incomplete"
            ),
        }
        Some(outcome)
    }

    fn log_disabled(&self, attempt: SyncAttempt, lead: &LeadSnapshot) {
        info!(
            op = %attempt,
            lead_number = %lead.lead_number(),
            base_url_set = !self.settings.base_url.trim().is_empty(),
            "remote task integration not configured; skipping sync"
        );
    }
}
