//! Shared world state for lead synchronisation scenarios.

use std::sync::Arc;

use lead_relay::lead::{
    adapters::memory::{InMemoryContactDirectory, InMemoryRemoteTaskClient, SharedRoutingTable},
    domain::{IntegrationSettings, LeadChangeEvent, RoutingTable},
    services::{LeadChangeRelay, RelayReport, SyncOrchestrator},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Relay type used by the BDD world.
pub type TestRelay = LeadChangeRelay<
    SharedRoutingTable,
    InMemoryRemoteTaskClient,
    DefaultClock,
    InMemoryContactDirectory,
>;

/// Scenario world for lead synchronisation behaviour tests.
pub struct LeadSyncWorld {
    /// Integration credentials handed to the relay.
    pub settings: IntegrationSettings,
    /// Routing declared by the scenario so far.
    pub routing_table: RoutingTable,
    /// Remote task service double.
    pub client: Arc<InMemoryRemoteTaskClient>,
    /// Report of the last relayed event.
    pub last_report: Option<RelayReport>,
}

impl LeadSyncWorld {
    /// Builds a relay over the routing declared so far.
    pub fn relay(&self) -> TestRelay {
        let orchestrator = SyncOrchestrator::new(
            self.settings.clone(),
            Arc::new(SharedRoutingTable::new(self.routing_table.clone())),
            Arc::clone(&self.client),
            Arc::new(DefaultClock),
        );
        LeadChangeRelay::new(orchestrator, Arc::new(InMemoryContactDirectory::new()))
    }

    /// Relays `event` and stores the report.
    pub fn relay_event(&mut self, event: LeadChangeEvent) -> Result<(), eyre::Report> {
        let report = run_async(self.relay().handle(event))?;
        self.last_report = Some(report);
        Ok(())
    }
}

impl Default for LeadSyncWorld {
    fn default() -> Self {
        Self {
            settings: IntegrationSettings::default(),
            routing_table: RoutingTable::new(),
            client: Arc::new(InMemoryRemoteTaskClient::new()),
            last_report: None,
        }
    }
}

/// Fixture providing a fresh world for each scenario.
#[fixture]
pub fn world() -> LeadSyncWorld {
    LeadSyncWorld::default()
}

/// Runs an async operation from a synchronous step.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
