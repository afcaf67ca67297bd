//! Value types exchanged with the remote task service.

use super::{FieldId, LeadDomainError, LeadNumber, RemoteTaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A value to set on one remote custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    field_id: FieldId,
    value: String,
}

impl FieldAssignment {
    /// Creates an assignment; the value is trimmed.
    #[must_use]
    pub fn new(field_id: FieldId, value: impl Into<String>) -> Self {
        Self {
            field_id,
            value: value.into().trim().to_owned(),
        }
    }

    /// Returns the remote field identifier.
    #[must_use]
    pub const fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    /// Returns the assigned value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Remote task priority, `1` (urgent) to `4` (low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TaskPriority(u8);

impl TaskPriority {
    /// Normal priority, used when none is configured.
    pub const NORMAL: Self = Self(3);

    /// Creates a priority, returning `None` outside `1..=4`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 4 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = LeadDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(LeadDomainError::InvalidPriority(value))
    }
}

impl From<TaskPriority> for u8 {
    fn from(value: TaskPriority) -> Self {
        value.0
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Payload for creating or updating a remote task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title.
    pub name: String,
    /// Markdown description.
    pub description: String,
    /// Task tags.
    pub tags: BTreeSet<String>,
    /// Task priority.
    pub priority: TaskPriority,
    /// Custom field assignments in logical field order.
    pub field_assignments: Vec<FieldAssignment>,
}

/// One custom field as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFieldValue {
    /// Remote field identifier.
    pub field_id: FieldId,
    /// Raw JSON value; absent values are `null`.
    pub raw_value: Value,
}

impl RemoteFieldValue {
    /// Creates a field value.
    #[must_use]
    pub const fn new(field_id: FieldId, raw_value: Value) -> Self {
        Self {
            field_id,
            raw_value,
        }
    }

    /// Returns the comparison form of the raw value.
    ///
    /// Numbers are converted to integers (floats truncate toward zero),
    /// strings are trimmed and lowercased, and `null` yields `None`.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        normalize_raw_value(&self.raw_value)
    }
}

fn normalize_raw_value(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(text) => Some(text.trim().to_lowercase()),
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Some(integer.to_string())
            } else if let Some(unsigned) = number.as_u64() {
                Some(unsigned.to_string())
            } else {
                let rendered = number
                    .as_f64()
                    .filter(|float| float.is_finite())
                    .map_or_else(|| number.to_string(), |float| format!("{:.0}", float.trunc()));
                Some(rendered)
            }
        }
        other => Some(other.to_string().trim().to_lowercase()),
    }
}

/// Read-only view of a remote task as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTaskSummary {
    /// Remote task identifier.
    pub id: RemoteTaskId,
    /// Task title.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Browser URL of the task.
    pub url: String,
    /// Custom field values in the order returned by the service.
    pub fields: Vec<RemoteFieldValue>,
}

impl RemoteTaskSummary {
    /// Creates a summary without custom fields.
    #[must_use]
    pub fn new(id: RemoteTaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            url: String::new(),
            fields: Vec::new(),
        }
    }

    /// Appends a custom field value.
    #[must_use]
    pub fn with_field(mut self, field_id: FieldId, raw_value: Value) -> Self {
        self.fields.push(RemoteFieldValue::new(field_id, raw_value));
        self
    }

    /// Returns `true` when the task carries the lead number in `field_id`.
    #[must_use]
    pub fn carries_lead_number(&self, field_id: &FieldId, lead_number: &LeadNumber) -> bool {
        let target = lead_number.normalized();
        self.fields
            .iter()
            .filter(|field| &field.field_id == field_id)
            .any(|field| field.normalized().as_deref() == Some(target.as_str()))
    }
}
