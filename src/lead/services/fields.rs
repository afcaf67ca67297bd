//! Conversion of lead and contact snapshots into remote task content.

use crate::lead::{
    domain::{
        ContactSnapshot, FieldAssignment, LeadCategory, LeadSnapshot, LeadSyncError,
        LeadSyncResult, LogicalField, TaskDraft, TaskPriority,
    },
    ports::RoutingSource,
    services::RoutingResolver,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use minijinja::{Environment, context};
use std::collections::BTreeSet;

const DESCRIPTION_TEMPLATE: &str = "\
**Lead: {{ name }}**

**Detalles del Lead:**
- **Número de Lead:** {{ lead_number }}
- **Nombre:** {{ name }}
{% if location %}
- **Ubicación:** {{ location }}
{% endif %}
{% if start_date %}
- **Fecha de Inicio:** {{ start_date }}
{% endif %}
{% if category %}
- **Tipo:** {{ category }}
{% endif %}
{% if contact_block %}

{{ contact_block }}
{% endif %}

---
*Creado automáticamente desde el sistema de gestión de leads*";

const LEAD_TAG: &str = "lead";
const AUTOMATED_TAG: &str = "automated";

/// Builds custom-field assignments, descriptions, titles and tags for
/// remote tasks.
pub struct FieldAssignmentBuilder<S>
where
    S: RoutingSource,
{
    resolver: RoutingResolver<S>,
}

impl<S> Clone for FieldAssignmentBuilder<S>
where
    S: RoutingSource,
{
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<S> FieldAssignmentBuilder<S>
where
    S: RoutingSource,
{
    /// Creates a builder resolving rules through `resolver`.
    #[must_use]
    pub const fn new(resolver: RoutingResolver<S>) -> Self {
        Self { resolver }
    }

    /// Builds the custom-field assignments for a lead.
    ///
    /// Assignments follow [`LogicalField::ALL`] order and are only emitted
    /// for fields mapped by the category's rule. A missing contact yields
    /// empty values.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSyncError::Configuration`] when the lead's category
    /// cannot be resolved.
    pub fn build(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<Vec<FieldAssignment>> {
        let rule = self.resolver.resolve(&lead.effective_category())?;
        let assignments = LogicalField::ALL
            .iter()
            .filter_map(|field| {
                rule.field_id(*field).map(|field_id| {
                    FieldAssignment::new(field_id.clone(), field_value(*field, lead, contact))
                })
            })
            .collect();
        Ok(assignments)
    }

    /// Renders the markdown task description.
    ///
    /// # Errors
    ///
    /// Returns [`LeadSyncError::Rendering`] when the template fails to
    /// render.
    pub fn build_description(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
    ) -> LeadSyncResult<String> {
        let mut environment = Environment::new();
        environment.set_trim_blocks(true);
        environment.set_lstrip_blocks(true);

        let start_date = lead.start_date().map(format_start_date).unwrap_or_default();
        let category = lead.category().map(LeadCategory::as_str).unwrap_or_default();
        let ctx = context! {
            name => lead.name(),
            lead_number => lead.lead_number().as_str(),
            location => lead.location().unwrap_or_default(),
            start_date => start_date,
            category => category,
            contact_block => contact_block(lead, contact),
        };
        environment
            .render_str(DESCRIPTION_TEMPLATE, ctx)
            .map_err(|err| LeadSyncError::Rendering(err.to_string()))
    }

    /// Returns the fixed tag set for a category.
    #[must_use]
    pub fn build_tags(&self, category: Option<&LeadCategory>) -> BTreeSet<String> {
        let category_tag = category
            .map_or(LeadCategory::DEFAULT, LeadCategory::as_str)
            .to_lowercase();
        [LEAD_TAG.to_owned(), category_tag, AUTOMATED_TAG.to_owned()]
            .into_iter()
            .collect()
    }

    /// Returns the task title, `Lead: {name} ({lead number})`.
    #[must_use]
    pub fn build_title(&self, lead: &LeadSnapshot) -> String {
        format!("Lead: {} ({})", lead.name(), lead.lead_number())
    }

    /// Assembles the complete task draft.
    ///
    /// # Errors
    ///
    /// Propagates configuration and rendering failures.
    pub fn build_draft(
        &self,
        lead: &LeadSnapshot,
        contact: Option<&ContactSnapshot>,
        priority: TaskPriority,
    ) -> LeadSyncResult<TaskDraft> {
        let field_assignments = self.build(lead, contact)?;
        Ok(TaskDraft {
            name: self.build_title(lead),
            description: self.build_description(lead, contact)?,
            tags: self.build_tags(lead.category()),
            priority,
            field_assignments,
        })
    }
}

fn field_value(field: LogicalField, lead: &LeadSnapshot, contact: Option<&ContactSnapshot>) -> String {
    let value = match field {
        LogicalField::ContactName => contact.map(ContactSnapshot::name),
        LogicalField::CompanyName => contact.map(ContactSnapshot::company),
        LogicalField::Email => contact.map(ContactSnapshot::email),
        LogicalField::Phone => contact.map(ContactSnapshot::phone),
        LogicalField::LocationText => lead.location(),
        LogicalField::LeadNumber => Some(lead.lead_number().as_str()),
    };
    value.unwrap_or_default().trim().to_owned()
}

/// Reformats a source date as `dd/MM/yyyy`, passing unparseable text
/// through unchanged.
fn format_start_date(raw: &str) -> String {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|timestamp| timestamp.date())
        })
        .map_or_else(|| raw.to_owned(), |date| date.format("%d/%m/%Y").to_string())
}

fn contact_block(lead: &LeadSnapshot, contact: Option<&ContactSnapshot>) -> String {
    let Some(found) = contact else {
        return lead
            .contact_id()
            .map(|id| format!("**Contact ID:** {id}"))
            .unwrap_or_default();
    };
    if found.is_blank() {
        return String::new();
    }

    let lines: Vec<String> = [
        ("Empresa", found.company()),
        ("Nombre", found.name()),
        ("Email", found.email()),
        ("Teléfono", found.phone()),
    ]
    .iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("- **{label}:** {}", value.trim()))
    .collect();

    format!("**Información de Contacto:**\n{}", lines.join("\n"))
}
