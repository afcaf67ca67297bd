//! Tiered search for the remote task that mirrors a lead.
//!
//! Matching compares the lead number against the custom field mapped to
//! [`LogicalField::LeadNumber`](crate::lead::domain::LogicalField) after
//! normalising both sides. When several tasks match, the one listed last by
//! the remote service is chosen. Listing order is not a documented recency
//! guarantee of the remote API.

use crate::lead::{
    domain::{
        ConfigurationFault, FieldId, LeadCategory, LeadNumber, LeadSnapshot, LeadSyncResult, ListId,
        RemoteTaskId, RoutingRule, SyncAttempt, SyncOutcome, SyncStatus, TransportFaultKind,
    },
    ports::{RemoteTaskClient, RemoteTaskClientError, RoutingSource},
    services::RoutingResolver,
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Tasks in one list whose lead number field matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMatch {
    /// Category whose rule pointed at the list.
    pub category: LeadCategory,
    /// Searched list.
    pub list_id: ListId,
    /// Field compared against the lead number.
    pub field_id: FieldId,
    /// Matching task ids in listing order; never empty.
    pub candidates: Vec<RemoteTaskId>,
}

impl ListMatch {
    /// Returns the task chosen by the tie-break: the last one listed.
    #[must_use]
    pub fn chosen(&self) -> Option<&RemoteTaskId> {
        self.candidates.last()
    }
}

/// Locates remote tasks for leads and drives the delete search.
pub struct TaskLocator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    resolver: RoutingResolver<S>,
    client: Arc<C>,
    clock: Arc<K>,
}

impl<S, C, K> Clone for TaskLocator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            client: Arc::clone(&self.client),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C, K> TaskLocator<S, C, K>
where
    S: RoutingSource,
    C: RemoteTaskClient,
    K: Clock + Send + Sync,
{
    /// Creates a locator.
    #[must_use]
    pub const fn new(resolver: RoutingResolver<S>, client: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            resolver,
            client,
            clock,
        }
    }

    /// Finds the task for a lead number in the category's own list.
    ///
    /// Returns `Ok(None)` when nothing matches or the category maps no lead
    /// number field.
    ///
    /// # Errors
    ///
    /// Returns configuration faults and remote listing failures.
    pub async fn find_task_id(
        &self,
        category: &LeadCategory,
        lead_number: &LeadNumber,
    ) -> LeadSyncResult<Option<RemoteTaskId>> {
        let rule = self.resolver.resolve(category)?;
        let Some(field_id) = rule.lead_number_field_id() else {
            warn!(
                category = %category,
                "no lead number field configured; cannot locate remote task"
            );
            return Ok(None);
        };
        let candidates = self
            .search_list(rule.list_id(), field_id, lead_number)
            .await?;
        log_ambiguity(lead_number, &candidates);
        Ok(candidates.last().cloned())
    }

    /// Searches the lists of every configured category except `declared`.
    ///
    /// Lists already covered by the declared category's rule are skipped.
    /// A list that cannot be read is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns a configuration fault when the routing table is unusable.
    pub async fn find_in_other_lists(
        &self,
        declared: &LeadCategory,
        lead_number: &LeadNumber,
    ) -> LeadSyncResult<Option<ListMatch>> {
        let rules = self.resolver.configured_rules()?;
        let mut searched: BTreeSet<(ListId, FieldId)> = rules
            .iter()
            .filter(|rule| rule.category() == declared)
            .filter_map(rule_search_key)
            .collect();

        for rule in rules.iter().filter(|rule| rule.category() != declared) {
            let Some(key) = rule_search_key(rule) else {
                continue;
            };
            if !searched.insert(key.clone()) {
                continue;
            }
            let (list_id, field_id) = key;
            match self.search_list(&list_id, &field_id, lead_number).await {
                Ok(candidates) if !candidates.is_empty() => {
                    info!(
                        lead_number = %lead_number,
                        declared = %declared,
                        found_in = %rule.category(),
                        list_id = %list_id,
                        "lead found in another category's list"
                    );
                    return Ok(Some(ListMatch {
                        category: rule.category().clone(),
                        list_id,
                        field_id,
                        candidates,
                    }));
                }
                Ok(_) => {}
                Err(err) => warn!(
                    list_id = %list_id,
                    category = %rule.category(),
                    error = %err,
                    "skipping unreadable list during cross-category search"
                ),
            }
        }
        Ok(None)
    }

    /// Runs the full delete search and deletion for a lead.
    ///
    /// Never fails: every fault is mapped onto a terminal [`SyncStatus`].
    pub async fn locate_for_delete(&self, lead: &LeadSnapshot) -> SyncOutcome {
        let category = lead.effective_category();
        let lead_number = lead.lead_number();
        let mut trace = DeleteTrace::new(lead_number.clone(), category.clone());

        let rule = match self.resolver.resolve(&category) {
            Ok(rule) => rule,
            Err(fault) => return self.config_error(trace, &fault),
        };
        trace.record_rule(&rule);

        let first = match self.search_rule(&rule, lead_number).await {
            Ok(candidates) => candidates,
            Err(err) => return self.search_failed(trace, &err),
        };

        let mut found = list_match(&rule, first);
        if found.is_none() {
            let refreshed = match self.resolver.resolve(&category) {
                Ok(refreshed) => refreshed,
                Err(fault) => return self.config_error(trace, &fault),
            };
            trace.note(format!(
                "no match in list {} using field {}; re-resolved lead number field to {} and retried",
                rule.list_id(),
                display_field(rule.lead_number_field_id()),
                display_field(refreshed.lead_number_field_id()),
            ));
            trace.record_rule(&refreshed);
            let retried = match self.search_rule(&refreshed, lead_number).await {
                Ok(candidates) => candidates,
                Err(err) => return self.search_failed(trace, &err),
            };
            found = list_match(&refreshed, retried);
        }

        if found.is_none() {
            match self.find_in_other_lists(&category, lead_number).await {
                Ok(Some(other)) => {
                    trace.advance(SyncStatus::FoundOtherList);
                    trace.note(format!(
                        "declared category '{category}' is stale: task found in list {} of category '{}'",
                        other.list_id, other.category
                    ));
                    found = Some(other);
                }
                Ok(None) => {}
                Err(err) => {
                    trace.note(format!("cross-category search failed: {err}"));
                }
            }
        }

        let Some(matched) = found else {
            trace.note(format!(
                "no remote task carries lead number {lead_number} in any configured list"
            ));
            info!(lead_number = %lead_number, "no remote task to delete");
            return trace.finish(SyncStatus::NotFound, &*self.clock);
        };

        let Some(task_id) = matched.chosen().cloned() else {
            return trace.finish(SyncStatus::NotFound, &*self.clock);
        };
        if matched.candidates.len() > 1 {
            log_ambiguity(lead_number, &matched.candidates);
            trace.note(format!(
                "{} tasks matched lead number {lead_number}: [{}]; selected {task_id} (last in listing order)",
                matched.candidates.len(),
                join_ids(&matched.candidates),
            ));
        }
        trace.record_match(&matched, task_id.clone());

        self.delete(trace, &task_id).await
    }

    async fn delete(&self, mut trace: DeleteTrace, task_id: &RemoteTaskId) -> SyncOutcome {
        match self.client.delete_task(task_id).await {
            Ok(true) => {
                info!(task_id = %task_id, lead_number = %trace.lead_number, "deleted remote task");
                trace.finish(SyncStatus::Deleted, &*self.clock)
            }
            Ok(false) => {
                warn!(task_id = %task_id, "remote service did not confirm deletion");
                trace.note(format!("delete of task {task_id} was not confirmed"));
                trace.finish(SyncStatus::DeleteFailed, &*self.clock)
            }
            Err(err) => {
                let status = match err.fault_kind() {
                    TransportFaultKind::NotFound => SyncStatus::NotFoundAfterDelete,
                    TransportFaultKind::Auth => SyncStatus::AuthError,
                    TransportFaultKind::Conflict => SyncStatus::Conflict,
                    TransportFaultKind::Other => SyncStatus::Error,
                };
                if status == SyncStatus::NotFoundAfterDelete {
                    warn!(task_id = %task_id, "remote task vanished before deletion");
                } else {
                    error!(task_id = %task_id, error = %err, "remote task deletion failed");
                }
                trace.note(format!("delete of task {task_id} failed: {err}"));
                trace.finish(status, &*self.clock)
            }
        }
    }

    async fn search_rule(
        &self,
        rule: &RoutingRule,
        lead_number: &LeadNumber,
    ) -> Result<Vec<RemoteTaskId>, RemoteTaskClientError> {
        match rule.lead_number_field_id() {
            Some(field_id) => self.search_list(rule.list_id(), field_id, lead_number).await,
            None => {
                warn!(
                    category = %rule.category(),
                    "no lead number field configured for category"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn search_list(
        &self,
        list_id: &ListId,
        field_id: &FieldId,
        lead_number: &LeadNumber,
    ) -> Result<Vec<RemoteTaskId>, RemoteTaskClientError> {
        let tasks = self.client.list_tasks(list_id).await?;
        let candidates: Vec<RemoteTaskId> = tasks
            .iter()
            .filter(|task| task.carries_lead_number(field_id, lead_number))
            .map(|task| task.id.clone())
            .collect();
        debug!(
            list_id = %list_id,
            field_id = %field_id,
            listed = tasks.len(),
            matched = candidates.len(),
            "searched remote list"
        );
        Ok(candidates)
    }

    fn config_error(&self, mut trace: DeleteTrace, fault: &ConfigurationFault) -> SyncOutcome {
        error!(lead_number = %trace.lead_number, %fault, "routing configuration fault");
        trace.note(fault.to_string());
        trace.finish(SyncStatus::ConfigError, &*self.clock)
    }

    fn search_failed(&self, mut trace: DeleteTrace, err: &RemoteTaskClientError) -> SyncOutcome {
        let status = match err.fault_kind() {
            TransportFaultKind::Auth => SyncStatus::AuthError,
            TransportFaultKind::Conflict => SyncStatus::Conflict,
            TransportFaultKind::NotFound | TransportFaultKind::Other => SyncStatus::Error,
        };
        error!(lead_number = %trace.lead_number, error = %err, "remote task search failed");
        trace.note(format!("listing remote tasks failed: {err}"));
        trace.finish(status, &*self.clock)
    }
}

fn rule_search_key(rule: &RoutingRule) -> Option<(ListId, FieldId)> {
    rule.lead_number_field_id()
        .map(|field_id| (rule.list_id().clone(), field_id.clone()))
}

fn list_match(rule: &RoutingRule, candidates: Vec<RemoteTaskId>) -> Option<ListMatch> {
    if candidates.is_empty() {
        return None;
    }
    rule.lead_number_field_id().map(|field_id| ListMatch {
        category: rule.category().clone(),
        list_id: rule.list_id().clone(),
        field_id: field_id.clone(),
        candidates,
    })
}

fn display_field(field_id: Option<&FieldId>) -> String {
    field_id.map_or_else(|| "<unmapped>".to_owned(), ToString::to_string)
}

fn join_ids(ids: &[RemoteTaskId]) -> String {
    ids.iter()
        .map(RemoteTaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_ambiguity(lead_number: &LeadNumber, candidates: &[RemoteTaskId]) {
    if candidates.len() > 1 {
        warn!(
            lead_number = %lead_number,
            candidates = %join_ids(candidates),
            "multiple remote tasks match lead number; choosing the last listed"
        );
    }
}

/// Accumulates the state of one delete attempt.
struct DeleteTrace {
    id: Uuid,
    lead_number: LeadNumber,
    category: LeadCategory,
    list_id: Option<ListId>,
    lead_number_field_id: Option<FieldId>,
    matched_category: Option<LeadCategory>,
    matched_list_id: Option<ListId>,
    task_id: Option<RemoteTaskId>,
    candidates: Vec<RemoteTaskId>,
    trail: Vec<SyncStatus>,
    notes: Vec<String>,
}

impl DeleteTrace {
    fn new(lead_number: LeadNumber, category: LeadCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead_number,
            category,
            list_id: None,
            lead_number_field_id: None,
            matched_category: None,
            matched_list_id: None,
            task_id: None,
            candidates: Vec::new(),
            trail: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn record_rule(&mut self, rule: &RoutingRule) {
        self.list_id = Some(rule.list_id().clone());
        self.lead_number_field_id = rule.lead_number_field_id().cloned();
    }

    fn record_match(&mut self, matched: &ListMatch, task_id: RemoteTaskId) {
        self.matched_category = Some(matched.category.clone());
        self.matched_list_id = Some(matched.list_id.clone());
        self.candidates.clone_from(&matched.candidates);
        self.task_id = Some(task_id);
    }

    fn note(&mut self, note: String) {
        self.notes.push(note);
    }

    fn advance(&mut self, status: SyncStatus) {
        self.trail.push(status);
    }

    fn finish(mut self, status: SyncStatus, clock: &impl Clock) -> SyncOutcome {
        self.trail.push(status);
        SyncOutcome {
            id: self.id,
            attempt: SyncAttempt::Delete,
            lead_number: self.lead_number,
            category: self.category,
            list_id: self.list_id,
            lead_number_field_id: self.lead_number_field_id,
            matched_category: self.matched_category,
            matched_list_id: self.matched_list_id,
            task_id: self.task_id,
            candidate_task_ids: self.candidates,
            status,
            trail: self.trail,
            diagnosis: self.notes.join("; "),
            completed_at: clock.utc(),
        }
    }
}
