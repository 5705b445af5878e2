//! Flow definitions.
//!
//! A flow pairs one trigger with an ordered list of steps. Flows are
//! immutable once built; register them with `Engine::add_flow`.

use crate::step::Step;
use crate::trigger::Trigger;
use hookflow_core::FlowId;

/// A named, immutable pipeline declaration.
#[derive(Debug, Clone)]
pub struct Flow {
    id: FlowId,
    name: String,
    trigger: Trigger,
    steps: Vec<Step>,
}

impl Flow {
    /// Creates a flow with no steps.
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            id: FlowId::new(),
            name: name.into(),
            trigger,
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends several steps, in order.
    #[must_use]
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    #[must_use]
    pub fn id(&self) -> FlowId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Names of every receiver the flow delivers to, in step order.
    #[must_use]
    pub fn receiver_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Receiver { receiver } => Some(receiver.as_str()),
                _ => None,
            })
            .collect()
    }
}
