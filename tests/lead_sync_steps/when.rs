//! When steps for lead synchronisation scenarios.

use super::world::LeadSyncWorld;
use eyre::WrapErr;
use lead_relay::lead::domain::LeadChangeEvent;
use rstest_bdd_macros::when;
use serde_json::{Value, json};

fn lead_record(number: &str, lead_type: &str) -> Value {
    json!({
        "id": 42,
        "leadNumber": number,
        "name": "Alpha Build",
        "leadType": lead_type,
    })
}

fn parse_event(payload: Value) -> Result<LeadChangeEvent, eyre::Report> {
    serde_json::from_value(payload).wrap_err("parse change event")
}

#[when(r#"lead "{number}" of type "{lead_type}" is inserted"#)]
fn lead_inserted(
    world: &mut LeadSyncWorld,
    number: String,
    lead_type: String,
) -> Result<(), eyre::Report> {
    let event = parse_event(json!({
        "operation": "INSERT",
        "entity": "leads",
        "record": lead_record(&number, &lead_type),
    }))?;
    world.relay_event(event).wrap_err("relay insert")
}

#[when(r#"lead "{number}" of type "{lead_type}" is deleted"#)]
fn lead_deleted(
    world: &mut LeadSyncWorld,
    number: String,
    lead_type: String,
) -> Result<(), eyre::Report> {
    let event = parse_event(json!({
        "operation": "DELETE",
        "entity": "leads",
        "oldRecord": lead_record(&number, &lead_type),
    }))?;
    world.relay_event(event).wrap_err("relay delete")
}
