//! Wire models for the remote task REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lead::domain::{FieldId, RemoteFieldValue, RemoteTaskId, RemoteTaskSummary, TaskDraft};

/// Request body for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskBody {
    pub name: String,
    pub markdown_description: String,
    pub tags: Vec<String>,
    pub priority: u8,
    pub custom_fields: Vec<CustomFieldBody>,
}

/// Request body for replacing the core content of a task.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTaskBody {
    pub name: String,
    pub markdown_description: String,
    pub priority: u8,
}

/// One custom field value sent on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomFieldBody {
    pub id: String,
    pub value: String,
}

/// Request body for setting a single custom field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldValueBody {
    pub value: String,
}

impl From<&TaskDraft> for CreateTaskBody {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            name: draft.name.clone(),
            markdown_description: draft.description.clone(),
            tags: draft.tags.iter().cloned().collect(),
            priority: draft.priority.value(),
            custom_fields: draft
                .field_assignments
                .iter()
                .map(|assignment| CustomFieldBody {
                    id: assignment.field_id().as_str().to_owned(),
                    value: assignment.value().to_owned(),
                })
                .collect(),
        }
    }
}

impl From<&TaskDraft> for UpdateTaskBody {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            name: draft.name.clone(),
            markdown_description: draft.description.clone(),
            priority: draft.priority.value(),
        }
    }
}

/// A task as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldDto>,
}

/// A custom field entry on a listed task.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldDto {
    pub id: String,
    #[serde(default)]
    pub value: Value,
}

/// One page of a task listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPageDto {
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
    #[serde(default = "last_page_default")]
    pub last_page: bool,
}

const fn last_page_default() -> bool {
    true
}

impl TaskDto {
    /// Converts the wire task into a summary.
    ///
    /// Returns `None` when the task identifier is blank. Custom fields with
    /// blank identifiers are dropped.
    pub fn into_summary(self) -> Option<RemoteTaskSummary> {
        let id = RemoteTaskId::parse(&self.id)?;
        let mut summary = RemoteTaskSummary::new(id, self.name);
        summary.description = self.description.unwrap_or_default();
        summary.url = self.url.unwrap_or_default();
        summary.fields = self
            .custom_fields
            .into_iter()
            .filter_map(|field| {
                FieldId::parse(&field.id).map(|field_id| RemoteFieldValue::new(field_id, field.value))
            })
            .collect();
        Some(summary)
    }
}
