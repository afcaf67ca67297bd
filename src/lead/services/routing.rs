//! Resolution of per-category routing rules.

use crate::lead::{
    domain::{ConfigurationFault, FieldId, LeadCategory, LogicalField, RoutingRule},
    ports::RoutingSource,
};
use std::sync::Arc;
use tracing::debug;

/// Resolves routing rules from a [`RoutingSource`].
///
/// Nothing is cached: every call reloads the table so that configuration
/// edits are visible to the next resolution.
pub struct RoutingResolver<S>
where
    S: RoutingSource,
{
    source: Arc<S>,
}

impl<S> Clone for RoutingResolver<S>
where
    S: RoutingSource,
{
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> RoutingResolver<S>
where
    S: RoutingSource,
{
    /// Creates a resolver over the given source.
    #[must_use]
    pub const fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Resolves the routing rule for a category.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationFault`] when the table cannot be loaded, is
    /// empty, lacks the category or has a blank list id for it.
    pub fn resolve(&self, category: &LeadCategory) -> Result<RoutingRule, ConfigurationFault> {
        let table = self.source.load()?;
        let rule = table.resolve(category)?;
        debug!(
            category = %category,
            list_id = %rule.list_id(),
            "resolved routing rule"
        );
        Ok(rule)
    }

    /// Resolves a single remote field id.
    ///
    /// Returns `Ok(None)` when the field is not mapped for the category.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationFault`] when the category itself cannot be
    /// resolved.
    pub fn field_id(
        &self,
        category: &LeadCategory,
        field: LogicalField,
    ) -> Result<Option<FieldId>, ConfigurationFault> {
        Ok(self.resolve(category)?.field_id(field).cloned())
    }

    /// Resolves the field id holding lead numbers for a category.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationFault`] when the category cannot be resolved.
    pub fn lead_number_field_id(
        &self,
        category: &LeadCategory,
    ) -> Result<Option<FieldId>, ConfigurationFault> {
        self.field_id(category, LogicalField::LeadNumber)
    }

    /// Returns every category that resolves to a usable rule, in table
    /// order. Entries with a blank list id are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationFault`] when the table cannot be loaded or is
    /// empty.
    pub fn configured_rules(&self) -> Result<Vec<RoutingRule>, ConfigurationFault> {
        let table = self.source.load()?;
        if table.is_empty() {
            return Err(ConfigurationFault::NoRoutingTable);
        }
        let rules = table
            .categories()
            .filter_map(|category| match table.resolve(category) {
                Ok(rule) => Some(rule),
                Err(fault) => {
                    debug!(category = %category, %fault, "skipping unusable routing entry");
                    None
                }
            })
            .collect();
        Ok(rules)
    }

    /// Returns the categories of [`Self::configured_rules`] in table order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::configured_rules`].
    pub fn configured_categories(&self) -> Result<Vec<LeadCategory>, ConfigurationFault> {
        Ok(self
            .configured_rules()?
            .into_iter()
            .map(|rule| rule.category().clone())
            .collect())
    }
}
