//! Connection settings for the remote task integration.

use super::TaskPriority;
use serde::{Deserialize, Serialize};

/// Remote integration settings.
///
/// The integration counts as disabled unless both the base URL and the
/// access token are non-blank.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    /// Base URL of the remote task API.
    #[serde(default)]
    pub base_url: String,
    /// Access token sent with every request.
    #[serde(default)]
    pub access_token: String,
    /// Priority applied to every drafted task.
    #[serde(default)]
    pub default_priority: TaskPriority,
}

impl IntegrationSettings {
    /// Creates settings with the normal default priority.
    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            default_priority: TaskPriority::default(),
        }
    }

    /// Sets the default priority.
    #[must_use]
    pub const fn with_default_priority(mut self, priority: TaskPriority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Returns `true` when the remote integration can be used.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.access_token.trim().is_empty()
    }

    /// Returns the base URL without surrounding whitespace or trailing `/`.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

impl std::fmt::Debug for IntegrationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationSettings")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("default_priority", &self.default_priority)
            .finish()
    }
}
