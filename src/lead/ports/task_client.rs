//! Remote task service port.

use crate::lead::domain::{
    LeadSyncError, ListId, RemoteTaskId, RemoteTaskSummary, TaskDraft, TransportFaultKind,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote task client operations.
pub type RemoteTaskClientResult<T> = Result<T, RemoteTaskClientError>;

/// Capability to manage tasks on the external project-tracking service.
///
/// Connection handling and pooling are the adapter's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteTaskClient: Send + Sync {
    /// Creates a task in the given list.
    async fn create_task(
        &self,
        list_id: &ListId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary>;

    /// Replaces the content and custom fields of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskClientError::NotFound`] when the task does not
    /// exist.
    async fn update_task(
        &self,
        task_id: &RemoteTaskId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary>;

    /// Deletes a task.
    ///
    /// Returns `Ok(false)` when the call completed but the service did not
    /// confirm deletion.
    async fn delete_task(&self, task_id: &RemoteTaskId) -> RemoteTaskClientResult<bool>;

    /// Lists every task in a list, in the order returned by the service.
    async fn list_tasks(&self, list_id: &ListId) -> RemoteTaskClientResult<Vec<RemoteTaskSummary>>;
}

/// Errors returned by remote task client adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteTaskClientError {
    /// Credentials were rejected (HTTP 401) or access forbidden (HTTP 403).
    #[error("remote service rejected the request credentials: {0}")]
    Unauthorized(String),

    /// The addressed task or list does not exist.
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// The remote service reported a conflicting change.
    #[error("remote service reported a conflict: {0}")]
    Conflict(String),

    /// The service answered with an unexpected status.
    #[error("remote service returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteTaskClientError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns the refined fault category.
    #[must_use]
    pub const fn fault_kind(&self) -> TransportFaultKind {
        match self {
            Self::Unauthorized(_) => TransportFaultKind::Auth,
            Self::NotFound(_) => TransportFaultKind::NotFound,
            Self::Conflict(_) => TransportFaultKind::Conflict,
            Self::Status { .. } | Self::Transport(_) => TransportFaultKind::Other,
        }
    }
}

impl From<RemoteTaskClientError> for LeadSyncError {
    fn from(err: RemoteTaskClientError) -> Self {
        Self::remote(err.fault_kind(), err.to_string())
    }
}
