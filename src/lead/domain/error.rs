//! Error types for lead synchronisation.
//!
//! Every failure surfaced by the sync services is a [`LeadSyncError`]. The
//! enum is closed: callers switch on [`LeadSyncError::kind`] at the boundary
//! instead of downcasting.

use super::LeadCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing lead domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadDomainError {
    /// The lead number is empty after trimming.
    #[error("lead number must not be empty")]
    EmptyLeadNumber,

    /// The lead category is empty after trimming.
    #[error("lead category must not be empty")]
    EmptyCategory,

    /// The task priority is outside `1..=4`.
    #[error("invalid task priority {0}, expected 1 to 4")]
    InvalidPriority(u8),

    /// A required record attribute is missing.
    #[error("lead record is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Routing configuration problems.
///
/// Faults are fatal to the operation that hit them and are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationFault {
    /// No routing table has been configured at all.
    #[error("no routing table is configured")]
    NoRoutingTable,

    /// The category has no routing entry.
    #[error("no routing rule is configured for category '{0}'")]
    UnknownCategory(LeadCategory),

    /// The category entry exists but its list identifier is blank.
    #[error("routing rule for category '{0}' has a blank list id")]
    BlankListId(LeadCategory),

    /// The routing source could not be read or parsed.
    #[error("routing configuration could not be loaded: {0}")]
    Unreadable(String),
}

/// Refinement of failures reported by the remote task service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFaultKind {
    /// Credentials were rejected or access was forbidden.
    Auth,
    /// The addressed remote resource does not exist.
    NotFound,
    /// The remote service reported a conflicting change.
    Conflict,
    /// Any other transport or protocol failure.
    Other,
}

impl TransportFaultKind {
    /// Returns the canonical label for logs and diagnosis text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TransportFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of [`LeadSyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadSyncErrorKind {
    /// Routing configuration is missing or incomplete.
    Configuration,
    /// The remote task service call failed.
    RemoteTransport,
    /// An inbound change event could not be converted.
    InvalidEvent,
    /// The task description template failed to render.
    Rendering,
}

/// Service-level error for lead synchronisation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadSyncError {
    /// Routing configuration fault.
    #[error("configuration fault: {0}")]
    Configuration(#[from] ConfigurationFault),

    /// Remote task service failure.
    #[error("remote task service failure ({kind}): {message}")]
    RemoteTransport {
        /// Refined failure category.
        kind: TransportFaultKind,
        /// Message reported by the transport.
        message: String,
    },

    /// Inbound record could not be converted into a lead snapshot.
    #[error("invalid change event: {0}")]
    InvalidEvent(#[from] LeadDomainError),

    /// Description rendering failed.
    #[error("failed to render task description: {0}")]
    Rendering(String),
}

impl LeadSyncError {
    /// Creates a remote transport error.
    #[must_use]
    pub fn remote(kind: TransportFaultKind, message: impl Into<String>) -> Self {
        Self::RemoteTransport {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error discriminant.
    #[must_use]
    pub const fn kind(&self) -> LeadSyncErrorKind {
        match self {
            Self::Configuration(_) => LeadSyncErrorKind::Configuration,
            Self::RemoteTransport { .. } => LeadSyncErrorKind::RemoteTransport,
            Self::InvalidEvent(_) => LeadSyncErrorKind::InvalidEvent,
            Self::Rendering(_) => LeadSyncErrorKind::Rendering,
        }
    }
}

/// Result type for lead synchronisation operations.
pub type LeadSyncResult<T> = Result<T, LeadSyncError>;
