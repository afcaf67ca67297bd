//! Structured results of sync attempts.

use super::{FieldId, LeadCategory, LeadNumber, ListId, RemoteTaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of sync operation that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAttempt {
    /// Remote task creation.
    Create,
    /// Remote task update.
    Update,
    /// Remote task deletion.
    Delete,
}

impl SyncAttempt {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Routing configuration was missing or incomplete.
    ConfigError,
    /// No remote task carries the lead number in any configured list.
    NotFound,
    /// The task was only found in a list of another category.
    FoundOtherList,
    /// The remote task was deleted.
    Deleted,
    /// The delete call completed but reported non-deletion.
    DeleteFailed,
    /// The task disappeared between search and delete.
    NotFoundAfterDelete,
    /// The remote service rejected the credentials.
    AuthError,
    /// The remote service reported a conflict.
    Conflict,
    /// Any other failure.
    Error,
}

impl SyncStatus {
    /// Returns the canonical status code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::FoundOtherList => "FOUND_OTHER_LIST",
            Self::Deleted => "DELETED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::NotFoundAfterDelete => "NOT_FOUND_AFTER_DELETE",
            Self::AuthError => "AUTH_ERROR",
            Self::Conflict => "CONFLICT",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-facing record of one sync attempt.
///
/// Outcomes are created fresh per operation and never persisted by the
/// engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Correlation identifier for log lines about this attempt.
    pub id: Uuid,
    /// Operation kind.
    pub attempt: SyncAttempt,
    /// Lead number the attempt targeted.
    pub lead_number: LeadNumber,
    /// Category declared by the lead, or the default one.
    pub category: LeadCategory,
    /// List resolved from the lead's declared category.
    pub list_id: Option<ListId>,
    /// Lead number field resolved for the declared category.
    pub lead_number_field_id: Option<FieldId>,
    /// Category whose list contained the chosen task.
    pub matched_category: Option<LeadCategory>,
    /// List in which the chosen task was found.
    pub matched_list_id: Option<ListId>,
    /// Chosen remote task.
    pub task_id: Option<RemoteTaskId>,
    /// Every matching task id in listing order.
    pub candidate_task_ids: Vec<RemoteTaskId>,
    /// Terminal status.
    pub status: SyncStatus,
    /// Statuses reached along the way, ending with `status`.
    pub trail: Vec<SyncStatus>,
    /// Human-readable explanation for operators.
    pub diagnosis: String,
    /// Time at which the attempt finished.
    pub completed_at: DateTime<Utc>,
}

impl SyncOutcome {
    /// Returns `true` when the task was found outside the declared
    /// category's list.
    #[must_use]
    pub fn found_in_other_list(&self) -> bool {
        self.matched_category
            .as_ref()
            .is_some_and(|matched| matched != &self.category)
    }

    /// Returns `true` when more than one remote task matched.
    #[must_use]
    pub fn was_ambiguous(&self) -> bool {
        self.candidate_task_ids.len() > 1
    }
}
