//! Builds an engine from configuration.

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::receivers::build_receiver;
use hookflow_flow::{Engine, LogReceiver};
use rootcause::prelude::Report;
use std::sync::Arc;
use tracing::info;

/// Name of the receiver that is always available, unless configuration
/// replaces it.
pub const DEFAULT_RECEIVER: &str = "log";

/// Registers the configured receivers and flows on a fresh engine.
///
/// # Errors
///
/// Returns an error if a receiver cannot be built or a flow fails to
/// compile. Receivers that flows reference but configuration does not
/// declare are not an error here; ingestion reports them.
pub fn build_engine(config: &WebhookConfig) -> Result<Engine, Report<WebhookError>> {
    let mut engine = Engine::new();
    engine.add_receiver(DEFAULT_RECEIVER, Arc::new(LogReceiver::new(DEFAULT_RECEIVER)));

    for receiver in &config.receivers {
        engine.add_receiver(receiver.name(), build_receiver(receiver)?);
    }

    for document in &config.flows {
        let flow = document
            .clone()
            .into_flow()
            .map_err(|e| WebhookError::InvalidFlow {
                flow: document.name.clone(),
                reason: e.to_string(),
            })?;
        engine.add_flow(flow);
    }

    info!(
        flows = engine.flows().len(),
        receivers = engine.receivers().len(),
        "engine ready"
    );
    Ok(engine)
}
