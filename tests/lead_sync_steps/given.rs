//! Given steps for lead synchronisation scenarios.

use super::world::LeadSyncWorld;
use eyre::{WrapErr, eyre};
use lead_relay::lead::domain::{
    FieldId, IntegrationSettings, LeadCategory, ListId, LogicalField, RemoteTaskId,
    RemoteTaskSummary, RoutingEntry,
};
use rstest_bdd_macros::given;
use serde_json::Value;

#[given("the remote task service is configured")]
fn service_configured(world: &mut LeadSyncWorld) {
    world.settings = IntegrationSettings::new("https://tasks.example/api/v2", "pk_scenario");
}

#[given("the remote task service is not configured")]
fn service_not_configured(world: &mut LeadSyncWorld) {
    world.settings = IntegrationSettings::default();
}

#[given(r#"category "{category}" routes to list "{list}" with lead number field "{field}""#)]
fn category_routes_to_list(
    world: &mut LeadSyncWorld,
    category: String,
    list: String,
    field: String,
) -> Result<(), eyre::Report> {
    let lead_category = LeadCategory::new(category).wrap_err("parse category")?;
    let table = std::mem::take(&mut world.routing_table);
    world.routing_table = table.with_entry(
        lead_category,
        RoutingEntry::new(list).with_field(LogicalField::LeadNumber, field),
    );
    Ok(())
}

#[given(r#"list "{list}" holds task "{task}" with "{number}" in field "{field}""#)]
fn list_holds_task(
    world: &mut LeadSyncWorld,
    list: String,
    task: String,
    number: String,
    field: String,
) -> Result<(), eyre::Report> {
    let list_id = ListId::parse(&list).ok_or_else(|| eyre!("blank list id"))?;
    let task_id = RemoteTaskId::parse(&task).ok_or_else(|| eyre!("blank task id"))?;
    let field_id = FieldId::parse(&field).ok_or_else(|| eyre!("blank field id"))?;
    let summary = RemoteTaskSummary::new(task_id, format!("Lead {number}"))
        .with_field(field_id, Value::String(number));
    world
        .client
        .seed_task(list_id, summary)
        .wrap_err("seed remote task")
}
