//! Ordered collection of registered flows.

use crate::definition::Flow;
use tracing::warn;

/// Append-only, ordered flow registry.
///
/// Route ids are not required to be unique. Lookup returns the first flow
/// registered for a route; later flows on the same route never match.
#[derive(Debug, Clone, Default)]
pub struct FlowRegistry {
    flows: Vec<Flow>,
}

impl FlowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `flow`.
    pub fn add(&mut self, flow: Flow) {
        if let Some(existing) = self.find_by_route_id(flow.trigger().route_id()) {
            warn!(
                route_id = %flow.trigger().route_id(),
                active_flow = %existing.name(),
                shadowed_flow = %flow.name(),
                "route already bound; new flow will never match"
            );
        }
        self.flows.push(flow);
    }

    /// First flow whose trigger listens on `route_id`.
    #[must_use]
    pub fn find_by_route_id(&self, route_id: &str) -> Option<&Flow> {
        self.flows.iter().find(|flow| flow.trigger().matches(route_id))
    }

    /// Flows in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flow> {
        self.flows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
