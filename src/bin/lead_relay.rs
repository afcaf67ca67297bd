//! Relays one lead change event to the remote task service.
//!
//! Usage:
//!
//! ```text
//! lead_relay <config-path> <event-path>
//! ```
//!
//! `config-path` is the relay configuration JSON. Its `routing` section is
//! re-read for every resolution, so edits apply without restarting a
//! long-running caller. `event-path` holds a single change event:
//!
//! ```json
//! {
//!   "operation": "INSERT",
//!   "entity": "leads",
//!   "record": {
//!     "id": 42,
//!     "lead_number": "042-0825",
//!     "name": "Alpha Build",
//!     "category": "construction"
//!   }
//! }
//! ```
//!
//! `LEAD_RELAY_BASE_URL`, `LEAD_RELAY_ACCESS_TOKEN` and
//! `LEAD_RELAY_DEFAULT_PRIORITY` override the integration settings.
//! `LEAD_RELAY_LOG_FORMAT` selects `pretty` (default) or `json` logs.

use std::env;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use lead_relay::config::{ConfigError, RelayConfig, read_text_file};
use lead_relay::lead::{
    adapters::{
        file::JsonFileRoutingSource, http::HttpRemoteTaskClient, memory::InMemoryContactDirectory,
    },
    domain::{LeadChangeEvent, LeadSyncError},
    ports::RemoteTaskClientError,
    services::{LeadChangeRelay, RelayReport, SyncOrchestrator},
};
use lead_relay::observability::{LogFormat, init_logging};
use mockable::DefaultClock;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};

const LOG_FORMAT_ENV: &str = "LEAD_RELAY_LOG_FORMAT";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while relaying an event.
#[derive(Debug, Error)]
enum RelayError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to parse change event: {0}")]
    EventParse(#[source] serde_json::Error),
    #[error("failed to build remote client: {0}")]
    Client(#[from] RemoteTaskClientError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error(transparent)]
    Sync(#[from] LeadSyncError),
}

fn main() -> Result<(), BoxError> {
    let log_format = env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    init_logging(log_format);

    let args = collect_args()?;
    run_relay(args.into_iter()).map_err(Into::into)
}

fn collect_args() -> Result<Vec<Utf8PathBuf>, RelayError> {
    env::args_os()
        .map(|arg_os| {
            let arg = arg_os
                .into_string()
                .map_err(|_| RelayError::InvalidArgs("argument is not valid UTF-8".into()))?;
            Ok(Utf8PathBuf::from(arg))
        })
        .collect()
}

fn parse_args(
    mut args: impl Iterator<Item = Utf8PathBuf>,
) -> Result<(Utf8PathBuf, Utf8PathBuf), RelayError> {
    let _program = args.next();
    let config_path = args
        .next()
        .ok_or_else(|| RelayError::InvalidArgs("missing config path argument".into()))?;
    let event_path = args
        .next()
        .ok_or_else(|| RelayError::InvalidArgs("missing event path argument".into()))?;
    if let Some(extra) = args.next() {
        let extra_arg = extra.as_str();
        return Err(RelayError::InvalidArgs(format!(
            "unexpected extra argument: {extra_arg}"
        )));
    }
    Ok((config_path, event_path))
}

fn load_event(event_path: &Utf8Path) -> Result<LeadChangeEvent, RelayError> {
    let contents = read_text_file(event_path)?;
    parse_event(&contents)
}

fn parse_event(contents: &str) -> Result<LeadChangeEvent, RelayError> {
    serde_json::from_str(contents).map_err(RelayError::EventParse)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, RelayError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(RelayError::RuntimeInit)
}

fn run_relay(args: impl Iterator<Item = Utf8PathBuf>) -> Result<(), RelayError> {
    let (config_path, event_path) = parse_args(args)?;
    let config = RelayConfig::load(&config_path)?.with_process_env()?;
    let event = load_event(&event_path)?;

    let client = Arc::new(HttpRemoteTaskClient::new(&config.integration)?);
    let routing = Arc::new(JsonFileRoutingSource::new(config_path));
    let orchestrator = SyncOrchestrator::new(
        config.integration,
        routing,
        client,
        Arc::new(DefaultClock),
    );
    let relay = LeadChangeRelay::new(orchestrator, Arc::new(InMemoryContactDirectory::new()));

    let runtime = build_runtime()?;
    let report = runtime.block_on(relay.handle(event))?;
    log_report(&report);
    Ok(())
}

fn log_report(report: &RelayReport) {
    match report {
        RelayReport::Ignored { reason } => info!(reason = %reason, "event ignored"),
        RelayReport::Created(Some(task)) | RelayReport::Updated(Some(task)) => {
            info!(task_id = %task.id, url = %task.url, "remote task written");
        }
        RelayReport::Created(None) | RelayReport::Updated(None) => {
            warn!("event relayed without a remote write");
        }
        RelayReport::Deleted(Some(outcome)) => info!(
            status = %outcome.status,
            task_id = ?outcome.task_id,
            diagnosis = %outcome.diagnosis,
            "delete relayed"
        ),
        RelayReport::Deleted(None) => warn!("delete relayed without a remote call"),
    }
}
