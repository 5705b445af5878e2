//! The engine: registration plus the single ingestion entry point.

use crate::definition::Flow;
use crate::matcher::TriggerMatcher;
use crate::outcome::Outcome;
use crate::pipeline::PipelineExecutor;
use crate::receiver::{EventReceiver, ReceiverRegistry};
use crate::registry::FlowRegistry;
use hookflow_core::IngestionId;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Owns the flow and receiver registries and routes events through them.
///
/// Registration needs `&mut self`; ingestion needs only `&self`. Build the
/// engine first, then share it (e.g. behind an `Arc`) for concurrent
/// ingestion.
#[derive(Debug, Default)]
pub struct Engine {
    flows: FlowRegistry,
    receivers: ReceiverRegistry,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flow. A flow reusing an already-bound route never matches.
    pub fn add_flow(&mut self, flow: Flow) {
        info!(
            flow = %flow.name(),
            flow_id = %flow.id(),
            route_id = %flow.trigger().route_id(),
            steps = flow.steps().len(),
            "registered flow"
        );
        self.flows.add(flow);
    }

    /// Registers a receiver under `name`, replacing any previous one.
    pub fn add_receiver(&mut self, name: impl Into<String>, receiver: Arc<dyn EventReceiver>) {
        self.receivers.add(name, receiver);
    }

    #[must_use]
    pub fn flows(&self) -> &FlowRegistry {
        &self.flows
    }

    #[must_use]
    pub fn receivers(&self) -> &ReceiverRegistry {
        &self.receivers
    }

    /// Routes one inbound event and reports how far it got.
    #[instrument(skip(self, payload), fields(ingestion_id = %IngestionId::new()))]
    pub async fn ingest(&self, route_id: &str, payload: JsonValue) -> Outcome {
        let outcome = self.dispatch(route_id, payload).await;
        if outcome.is_success() {
            info!(outcome = outcome.name(), "event processed");
        } else {
            warn!(outcome = outcome.name(), detail = %outcome, "event not processed");
        }
        outcome
    }

    async fn dispatch(&self, route_id: &str, payload: JsonValue) -> Outcome {
        let flow = match TriggerMatcher::new(&self.flows).resolve(route_id) {
            Ok(flow) => flow,
            Err(outcome) => return outcome,
        };

        let input = match flow.trigger().schema().validate(&payload).into_result() {
            Ok(value) => value,
            Err(detail) => return Outcome::SchemaRejected { detail },
        };

        PipelineExecutor::new(&self.receivers).run(flow, input).await
    }
}
