//! In-memory remote task client for sync tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::lead::{
    domain::{ListId, RemoteFieldValue, RemoteTaskId, RemoteTaskSummary, TaskDraft},
    ports::{RemoteTaskClient, RemoteTaskClientError, RemoteTaskClientResult},
};

/// A call received by [`InMemoryRemoteTaskClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// `create_task` in a list.
    Create(ListId),
    /// `update_task` for a task.
    Update(RemoteTaskId),
    /// `delete_task` for a task.
    Delete(RemoteTaskId),
    /// `list_tasks` for a list.
    List(ListId),
}

/// Thread-safe in-memory stand-in for the remote task service.
///
/// Tasks keep insertion order within each list, which is the order
/// `list_tasks` returns them in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteTaskClient {
    state: Arc<RwLock<InMemoryClientState>>,
}

#[derive(Debug, Default)]
struct InMemoryClientState {
    lists: BTreeMap<ListId, Vec<RemoteTaskSummary>>,
    drafts: BTreeMap<RemoteTaskId, TaskDraft>,
    calls: Vec<RemoteCall>,
    next_id: u64,
    delete_failure: Option<RemoteTaskClientError>,
    list_failures: BTreeMap<ListId, RemoteTaskClientError>,
    unconfirmed_deletes: bool,
}

fn lock_error(err: impl std::fmt::Display) -> RemoteTaskClientError {
    RemoteTaskClientError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryRemoteTaskClient {
    /// Creates an empty client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an existing task to a list.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_task(&self, list_id: ListId, task: RemoteTaskSummary) -> RemoteTaskClientResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.lists.entry(list_id).or_default().push(task);
        Ok(())
    }

    /// Makes the next `delete_task` call fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_next_delete(&self, error: RemoteTaskClientError) -> RemoteTaskClientResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.delete_failure = Some(error);
        Ok(())
    }

    /// Makes every `list_tasks` call for `list_id` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_listing(
        &self,
        list_id: ListId,
        error: RemoteTaskClientError,
    ) -> RemoteTaskClientResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.list_failures.insert(list_id, error);
        Ok(())
    }

    /// Makes `delete_task` complete without confirming deletion.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn leave_deletes_unconfirmed(&self) -> RemoteTaskClientResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unconfirmed_deletes = true;
        Ok(())
    }

    /// Returns every call received so far, in order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn calls(&self) -> RemoteTaskClientResult<Vec<RemoteCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }

    /// Returns how many times a list was listed.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn list_calls(&self, list_id: &ListId) -> RemoteTaskClientResult<usize> {
        Ok(self
            .calls()?
            .iter()
            .filter(|call| matches!(call, RemoteCall::List(listed) if listed == list_id))
            .count())
    }

    /// Returns how many delete calls were issued.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn delete_calls(&self) -> RemoteTaskClientResult<usize> {
        Ok(self
            .calls()?
            .iter()
            .filter(|call| matches!(call, RemoteCall::Delete(_)))
            .count())
    }

    /// Returns the tasks currently stored in a list.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn tasks_in(&self, list_id: &ListId) -> RemoteTaskClientResult<Vec<RemoteTaskSummary>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.lists.get(list_id).cloned().unwrap_or_default())
    }

    /// Returns the last draft written for a task.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn draft_for(&self, task_id: &RemoteTaskId) -> RemoteTaskClientResult<Option<TaskDraft>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.drafts.get(task_id).cloned())
    }
}

fn apply_draft(task: &mut RemoteTaskSummary, draft: &TaskDraft) {
    task.name.clone_from(&draft.name);
    task.description.clone_from(&draft.description);
    task.fields = draft
        .field_assignments
        .iter()
        .map(|assignment| {
            RemoteFieldValue::new(
                assignment.field_id().clone(),
                Value::String(assignment.value().to_owned()),
            )
        })
        .collect();
}

#[async_trait]
impl RemoteTaskClient for InMemoryRemoteTaskClient {
    async fn create_task(
        &self,
        list_id: &ListId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(RemoteCall::Create(list_id.clone()));
        state.next_id += 1;
        let raw_id = format!("task-{}", state.next_id);
        let task_id = RemoteTaskId::parse(&raw_id)
            .ok_or_else(|| RemoteTaskClientError::Conflict(format!("invalid task id {raw_id}")))?;

        let mut task = RemoteTaskSummary::new(task_id.clone(), draft.name.clone());
        task.url = format!("memory://task/{task_id}");
        apply_draft(&mut task, draft);

        state.drafts.insert(task_id, draft.clone());
        state
            .lists
            .entry(list_id.clone())
            .or_default()
            .push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        task_id: &RemoteTaskId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(RemoteCall::Update(task_id.clone()));
        let task = state
            .lists
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|task| &task.id == task_id)
            .ok_or_else(|| RemoteTaskClientError::NotFound(format!("task {task_id}")))?;
        apply_draft(task, draft);
        let updated = task.clone();
        state.drafts.insert(task_id.clone(), draft.clone());
        Ok(updated)
    }

    async fn delete_task(&self, task_id: &RemoteTaskId) -> RemoteTaskClientResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(RemoteCall::Delete(task_id.clone()));
        if let Some(error) = state.delete_failure.take() {
            return Err(error);
        }
        if state.unconfirmed_deletes {
            return Ok(false);
        }

        let mut removed = false;
        for tasks in state.lists.values_mut() {
            let before = tasks.len();
            tasks.retain(|task| &task.id != task_id);
            removed |= tasks.len() != before;
        }
        if !removed {
            return Err(RemoteTaskClientError::NotFound(format!("task {task_id}")));
        }
        state.drafts.remove(task_id);
        Ok(true)
    }

    async fn list_tasks(&self, list_id: &ListId) -> RemoteTaskClientResult<Vec<RemoteTaskSummary>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(RemoteCall::List(list_id.clone()));
        if let Some(error) = state.list_failures.get(list_id) {
            return Err(error.clone());
        }
        Ok(state.lists.get(list_id).cloned().unwrap_or_default())
    }
}
