//! Lead and contact snapshots passed into the sync engine.

use super::{ContactId, LeadDomainError, LeadId, LeadNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lead-type classification controlling which remote list receives the lead.
///
/// Categories are stored trimmed and lowercased so that routing keys and
/// tags compare consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LeadCategory(String);

impl LeadCategory {
    /// Category assumed when a lead does not declare one.
    pub const DEFAULT: &'static str = "construction";

    /// Creates a normalized category.
    ///
    /// # Errors
    ///
    /// Returns [`LeadDomainError::EmptyCategory`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, LeadDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LeadDomainError::EmptyCategory);
        }
        Ok(Self(normalized))
    }

    /// Returns the default `construction` category.
    #[must_use]
    pub fn default_category() -> Self {
        Self(Self::DEFAULT.to_owned())
    }

    /// Returns the normalized label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LeadCategory {
    type Error = LeadDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LeadCategory> for String {
    fn from(value: LeadCategory) -> Self {
        value.0
    }
}

impl fmt::Display for LeadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let raw = value.into();
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Immutable view of a lead at the time of a change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSnapshot {
    id: LeadId,
    lead_number: LeadNumber,
    name: String,
    category: Option<LeadCategory>,
    location: Option<String>,
    start_date: Option<String>,
    status: Option<String>,
    contact_id: Option<ContactId>,
}

impl LeadSnapshot {
    /// Creates a snapshot with the required lead attributes.
    #[must_use]
    pub fn new(id: LeadId, lead_number: LeadNumber, name: impl Into<String>) -> Self {
        Self {
            id,
            lead_number,
            name: name.into().trim().to_owned(),
            category: None,
            location: None,
            start_date: None,
            status: None,
            contact_id: None,
        }
    }

    /// Sets the lead category.
    #[must_use]
    pub fn with_category(mut self, category: LeadCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the free-text location. Blank values are dropped.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    /// Sets the start date in its source format. Blank values are dropped.
    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = non_blank(start_date);
        self
    }

    /// Sets the lead status. Blank values are dropped.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = non_blank(status);
        self
    }

    /// Sets the referenced contact.
    #[must_use]
    pub const fn with_contact_id(mut self, contact_id: ContactId) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    /// Returns the local lead identifier.
    #[must_use]
    pub const fn id(&self) -> LeadId {
        self.id
    }

    /// Returns the lead number.
    #[must_use]
    pub const fn lead_number(&self) -> &LeadNumber {
        &self.lead_number
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared category, if any.
    #[must_use]
    pub const fn category(&self) -> Option<&LeadCategory> {
        self.category.as_ref()
    }

    /// Returns the declared category or the default `construction` one.
    #[must_use]
    pub fn effective_category(&self) -> LeadCategory {
        self.category
            .clone()
            .unwrap_or_else(LeadCategory::default_category)
    }

    /// Returns the location text.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the start date in its source format.
    #[must_use]
    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    /// Returns the lead status.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the referenced contact identifier.
    #[must_use]
    pub const fn contact_id(&self) -> Option<ContactId> {
        self.contact_id
    }
}

/// Immutable view of the contact attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    id: ContactId,
    name: String,
    company: String,
    email: String,
    phone: String,
}

impl ContactSnapshot {
    /// Creates a contact with all descriptive fields empty.
    #[must_use]
    pub const fn new(id: ContactId) -> Self {
        Self {
            id,
            name: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }

    /// Sets the contact display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into().trim().to_owned();
        self
    }

    /// Sets the company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into().trim().to_owned();
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into().trim().to_owned();
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into().trim().to_owned();
        self
    }

    /// Returns the contact identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the company name.
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns `true` when every descriptive field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.company, &self.email, &self.phone]
            .iter()
            .all(|value| value.trim().is_empty())
    }
}
