//! Identifier and validated scalar types for the lead domain.

use super::LeadDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a lead record in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(u64);

impl LeadId {
    /// Wraps a raw lead identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a contact record in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(u64);

impl ContactId {
    /// Wraps a raw contact identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable lead number such as `042-0825`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadNumber(String);

impl LeadNumber {
    /// Creates a validated lead number.
    ///
    /// # Errors
    ///
    /// Returns [`LeadDomainError::EmptyLeadNumber`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, LeadDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LeadDomainError::EmptyLeadNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the lead number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the comparison form used when matching remote field values.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl fmt::Display for LeadNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips a trailing `#` comment and surrounding whitespace from a
/// hand-edited identifier. Returns `None` when nothing remains.
#[must_use]
pub fn sanitize_identifier(raw: &str) -> Option<String> {
    let without_comment = raw.split_once('#').map_or(raw, |(head, _)| head);
    let trimmed = without_comment.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

macro_rules! remote_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from configuration or remote text.
            ///
            /// Inline `#` comments and surrounding whitespace are removed;
            /// `None` is returned when the value is blank.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                sanitize_identifier(raw).map(Self)
            }

            /// Returns the identifier as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

remote_identifier!(
    /// Identifier of a list on the remote task service.
    ListId
);

remote_identifier!(
    /// Identifier of a custom field on the remote task service.
    FieldId
);

remote_identifier!(
    /// Identifier of a task on the remote task service.
    RemoteTaskId
);
