//! Resolves an inbound route to the flow bound to it.

use crate::definition::Flow;
use crate::outcome::Outcome;
use crate::registry::FlowRegistry;

/// Matches inbound route ids against a flow registry.
#[derive(Debug, Clone, Copy)]
pub struct TriggerMatcher<'a> {
    flows: &'a FlowRegistry,
}

impl<'a> TriggerMatcher<'a> {
    #[must_use]
    pub fn new(flows: &'a FlowRegistry) -> Self {
        Self { flows }
    }

    /// Returns the flow for `route_id`, or `Outcome::NoMatchingFlow`.
    ///
    /// # Errors
    ///
    /// The error side is a terminal outcome, not a failure of the matcher.
    pub fn resolve(&self, route_id: &str) -> Result<&'a Flow, Outcome> {
        self.flows
            .find_by_route_id(route_id)
            .ok_or_else(|| Outcome::NoMatchingFlow {
                route_id: route_id.to_string(),
            })
    }
}
