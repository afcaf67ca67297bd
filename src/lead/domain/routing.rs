//! Per-category routing of leads to remote lists and custom fields.

use super::{ConfigurationFault, FieldId, LeadCategory, ListId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lead attributes that can be mirrored into remote custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    /// Contact display name.
    ContactName,
    /// Contact company name.
    CompanyName,
    /// Contact email address.
    Email,
    /// Contact phone number.
    Phone,
    /// Lead location text.
    LocationText,
    /// Lead number, also used to find the task again.
    LeadNumber,
}

impl LogicalField {
    /// Every logical field in assignment order.
    pub const ALL: [Self; 6] = [
        Self::ContactName,
        Self::CompanyName,
        Self::Email,
        Self::Phone,
        Self::LocationText,
        Self::LeadNumber,
    ];

    /// Returns the configuration key for the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContactName => "contact_name",
            Self::CompanyName => "company_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::LocationText => "location_text",
            Self::LeadNumber => "lead_number",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw routing entry for one category, as written in configuration.
///
/// Values are kept verbatim; sanitisation happens during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    /// Remote list receiving leads of the category.
    #[serde(default)]
    pub list_id: Option<String>,
    /// Remote custom field identifiers keyed by logical field.
    #[serde(default)]
    pub fields: BTreeMap<LogicalField, Option<String>>,
}

impl RoutingEntry {
    /// Creates an entry targeting the given list.
    #[must_use]
    pub fn new(list_id: impl Into<String>) -> Self {
        Self {
            list_id: Some(list_id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Maps a logical field to a remote field identifier.
    #[must_use]
    pub fn with_field(mut self, field: LogicalField, field_id: impl Into<String>) -> Self {
        self.fields.insert(field, Some(field_id.into()));
        self
    }
}

/// Category-keyed routing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    entries: BTreeMap<LeadCategory, RoutingEntry>,
}

impl RoutingTable {
    /// Creates an empty table. An empty table counts as "not configured".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for a category.
    #[must_use]
    pub fn with_entry(mut self, category: LeadCategory, entry: RoutingEntry) -> Self {
        self.entries.insert(category, entry);
        self
    }

    /// Returns `true` when no category is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns configured categories in table order.
    pub fn categories(&self) -> impl Iterator<Item = &LeadCategory> {
        self.entries.keys()
    }

    /// Resolves the rule for a category.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationFault::NoRoutingTable`] when the table is
    /// empty, [`ConfigurationFault::UnknownCategory`] when the category has no
    /// entry and [`ConfigurationFault::BlankListId`] when the entry's list id
    /// is missing or blank.
    pub fn resolve(&self, category: &LeadCategory) -> Result<RoutingRule, ConfigurationFault> {
        if self.entries.is_empty() {
            return Err(ConfigurationFault::NoRoutingTable);
        }
        let entry = self
            .entries
            .get(category)
            .ok_or_else(|| ConfigurationFault::UnknownCategory(category.clone()))?;
        let list_id = entry
            .list_id
            .as_deref()
            .and_then(ListId::parse)
            .ok_or_else(|| ConfigurationFault::BlankListId(category.clone()))?;
        let field_ids = entry
            .fields
            .iter()
            .filter_map(|(field, raw)| {
                raw.as_deref()
                    .and_then(FieldId::parse)
                    .map(|field_id| (*field, field_id))
            })
            .collect();

        Ok(RoutingRule {
            category: category.clone(),
            list_id,
            field_ids,
        })
    }
}

/// Resolved routing for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    category: LeadCategory,
    list_id: ListId,
    field_ids: BTreeMap<LogicalField, FieldId>,
}

impl RoutingRule {
    /// Returns the category this rule was resolved for.
    #[must_use]
    pub const fn category(&self) -> &LeadCategory {
        &self.category
    }

    /// Returns the remote list identifier.
    #[must_use]
    pub const fn list_id(&self) -> &ListId {
        &self.list_id
    }

    /// Returns the remote field id for a logical field, if mapped.
    #[must_use]
    pub fn field_id(&self, field: LogicalField) -> Option<&FieldId> {
        self.field_ids.get(&field)
    }

    /// Returns the remote field id holding the lead number, if mapped.
    #[must_use]
    pub fn lead_number_field_id(&self) -> Option<&FieldId> {
        self.field_id(LogicalField::LeadNumber)
    }
}
