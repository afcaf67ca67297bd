//! Inbound change events and their wire records.
//!
//! Records arrive as loosely-typed mappings; the conversions below are the
//! only place where wire names meet domain types.

use super::{
    ContactId, ContactSnapshot, LeadCategory, LeadDomainError, LeadId, LeadNumber, LeadSnapshot,
};
use serde::{Deserialize, Serialize};

/// Entity name whose events are relayed.
pub const LEADS_ENTITY: &str = "leads";

/// Kind of change carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOperation {
    /// A record was inserted.
    Insert,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
    /// Any operation this relay does not handle.
    #[serde(other)]
    Unknown,
}

/// Lead-shaped record as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Local lead identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// Human-readable lead number.
    #[serde(default, alias = "leadNumber")]
    pub lead_number: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Lead category.
    #[serde(default, alias = "leadType", alias = "category")]
    pub lead_type: Option<String>,
    /// Location text.
    #[serde(default)]
    pub location: Option<String>,
    /// Start date in source format.
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    /// Lead status.
    #[serde(default)]
    pub status: Option<String>,
    /// Referenced contact.
    #[serde(default, alias = "contactId")]
    pub contact_id: Option<u64>,
}

impl TryFrom<LeadRecord> for LeadSnapshot {
    type Error = LeadDomainError;

    fn try_from(record: LeadRecord) -> Result<Self, Self::Error> {
        let id = record.id.ok_or(LeadDomainError::MissingField("id"))?;
        let lead_number = LeadNumber::new(
            record
                .lead_number
                .ok_or(LeadDomainError::MissingField("lead_number"))?,
        )?;
        let mut snapshot = Self::new(
            LeadId::new(id),
            lead_number,
            record.name.unwrap_or_default(),
        );
        if let Some(category) = record
            .lead_type
            .filter(|value| !value.trim().is_empty())
        {
            snapshot = snapshot.with_category(LeadCategory::new(category)?);
        }
        if let Some(location) = record.location {
            snapshot = snapshot.with_location(location);
        }
        if let Some(start_date) = record.start_date {
            snapshot = snapshot.with_start_date(start_date);
        }
        if let Some(status) = record.status {
            snapshot = snapshot.with_status(status);
        }
        if let Some(contact_id) = record.contact_id {
            snapshot = snapshot.with_contact_id(ContactId::new(contact_id));
        }
        Ok(snapshot)
    }
}

/// Contact record optionally embedded in an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Local contact identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Company name.
    #[serde(default, alias = "company_name", alias = "companyName")]
    pub company: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<ContactRecord> for ContactSnapshot {
    fn from(record: ContactRecord) -> Self {
        Self::new(ContactId::new(record.id))
            .with_name(record.name.unwrap_or_default())
            .with_company(record.company.unwrap_or_default())
            .with_email(record.email.unwrap_or_default())
            .with_phone(record.phone.unwrap_or_default())
    }
}

/// Discriminated change notification for a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadChangeEvent {
    /// Change kind.
    pub operation: ChangeOperation,
    /// Entity name; only [`LEADS_ENTITY`] is relayed.
    pub entity: String,
    /// Current record (inserted or updated state).
    #[serde(default)]
    pub record: Option<LeadRecord>,
    /// Previous record, sent with deletes.
    #[serde(default, alias = "old_record")]
    pub old_record: Option<LeadRecord>,
    /// Contact snapshot supplied by the sender, if any.
    #[serde(default)]
    pub contact: Option<ContactRecord>,
}

impl LeadChangeEvent {
    /// Creates an event for the `leads` entity.
    #[must_use]
    pub fn for_leads(operation: ChangeOperation, record: LeadRecord) -> Self {
        Self {
            operation,
            entity: LEADS_ENTITY.to_owned(),
            record: Some(record),
            old_record: None,
            contact: None,
        }
    }

    /// Returns `true` when the event concerns leads.
    #[must_use]
    pub fn is_lead_event(&self) -> bool {
        self.entity.trim().eq_ignore_ascii_case(LEADS_ENTITY)
    }
}
