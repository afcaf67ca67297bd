//! Shared fixtures for lead sync unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mockable::DefaultClock;
use serde_json::Value;

use crate::lead::{
    adapters::memory::{InMemoryRemoteTaskClient, SharedRoutingTable},
    domain::{
        FieldId, IntegrationSettings, LeadCategory, LeadId, LeadNumber, LeadSnapshot, ListId,
        LogicalField, RemoteTaskId, RemoteTaskSummary, RoutingEntry, RoutingTable,
    },
    ports::{RoutingSource, RoutingSourceResult},
    services::{SyncOrchestrator, TaskLocator},
};

pub const CONSTRUCTION_LIST: &str = "901";
pub const RETAIL_LIST: &str = "902";
pub const SOLAR_LIST: &str = "903";
pub const NUMBER_FIELD: &str = "fld-number";
pub const RETAIL_NUMBER_FIELD: &str = "fld-number-retail";
pub const SOLAR_NUMBER_FIELD: &str = "fld-number-solar";
pub const LEAD_NUMBER: &str = "042-0825";

pub type MemoryOrchestrator =
    SyncOrchestrator<SharedRoutingTable, InMemoryRemoteTaskClient, DefaultClock>;

pub fn category(raw: &str) -> LeadCategory {
    LeadCategory::new(raw).expect("valid category")
}

pub fn list(raw: &str) -> ListId {
    ListId::parse(raw).expect("valid list id")
}

pub fn field(raw: &str) -> FieldId {
    FieldId::parse(raw).expect("valid field id")
}

pub fn task_id(raw: &str) -> RemoteTaskId {
    RemoteTaskId::parse(raw).expect("valid task id")
}

pub fn lead_number(raw: &str) -> LeadNumber {
    LeadNumber::new(raw).expect("valid lead number")
}

/// Routing for `construction` (all fields mapped), `retail` and `solar`.
pub fn routing_table() -> RoutingTable {
    RoutingTable::new()
        .with_entry(
            category("construction"),
            RoutingEntry::new(CONSTRUCTION_LIST)
                .with_field(LogicalField::ContactName, "fld-contact")
                .with_field(LogicalField::CompanyName, "fld-company")
                .with_field(LogicalField::Email, "fld-email")
                .with_field(LogicalField::Phone, "fld-phone")
                .with_field(LogicalField::LocationText, "fld-location")
                .with_field(LogicalField::LeadNumber, NUMBER_FIELD),
        )
        .with_entry(
            category("retail"),
            RoutingEntry::new(RETAIL_LIST).with_field(LogicalField::LeadNumber, RETAIL_NUMBER_FIELD),
        )
        .with_entry(
            category("solar"),
            RoutingEntry::new(SOLAR_LIST).with_field(LogicalField::LeadNumber, SOLAR_NUMBER_FIELD),
        )
}

pub fn lead(number: &str) -> LeadSnapshot {
    LeadSnapshot::new(LeadId::new(1), lead_number(number), "Alpha Build")
}

pub fn construction_lead() -> LeadSnapshot {
    lead(LEAD_NUMBER).with_category(category("construction"))
}

pub fn task_carrying(id: &str, field_id: &str, value: Value) -> RemoteTaskSummary {
    RemoteTaskSummary::new(task_id(id), format!("Task {id}")).with_field(field(field_id), value)
}

pub fn settings() -> IntegrationSettings {
    IntegrationSettings::new("https://api.example/v2", "pk_test")
}

pub fn orchestrator(
    routing: &Arc<SharedRoutingTable>,
    client: &Arc<InMemoryRemoteTaskClient>,
) -> MemoryOrchestrator {
    SyncOrchestrator::new(
        settings(),
        Arc::clone(routing),
        Arc::clone(client),
        Arc::new(DefaultClock),
    )
}

pub fn locator<S: RoutingSource>(
    routing: Arc<S>,
    client: &Arc<InMemoryRemoteTaskClient>,
) -> TaskLocator<S, InMemoryRemoteTaskClient, DefaultClock> {
    TaskLocator::new(
        crate::lead::services::RoutingResolver::new(routing),
        Arc::clone(client),
        Arc::new(DefaultClock),
    )
}

/// Routing source returning a different table on each load.
///
/// Once the sequence is exhausted the last table is repeated.
pub struct SequencedRoutingSource {
    tables: Vec<RoutingTable>,
    loads: AtomicUsize,
}

impl SequencedRoutingSource {
    pub fn new(tables: Vec<RoutingTable>) -> Self {
        Self {
            tables,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RoutingSource for SequencedRoutingSource {
    fn load(&self) -> RoutingSourceResult<RoutingTable> {
        let index = self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tables
            .get(index)
            .or_else(|| self.tables.last())
            .cloned()
            .unwrap_or_default())
    }
}
