//! Sequential step execution.
//!
//! Steps run strictly in declaration order. Each step's output becomes the
//! next step's input. The chain stops at the first step that:
//! 1. produces empty output (`Outcome::Halted`, a normal ending; receiver
//!    steps always end here)
//! 2. names an unregistered receiver (`Outcome::UnknownReceiver`)
//! 3. has an unsupported kind (`Outcome::UnknownStepKind`)
//! 4. returns an error (`Outcome::StepFailed`)

use crate::definition::Flow;
use crate::outcome::Outcome;
use crate::receiver::ReceiverRegistry;
use crate::step::{Step, is_empty_output};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Runs a flow's steps against a validated input.
#[derive(Debug, Clone, Copy)]
pub struct PipelineExecutor<'a> {
    receivers: &'a ReceiverRegistry,
}

impl<'a> PipelineExecutor<'a> {
    #[must_use]
    pub fn new(receivers: &'a ReceiverRegistry) -> Self {
        Self { receivers }
    }

    /// Threads `input` through every step of `flow`.
    pub async fn run(&self, flow: &Flow, input: JsonValue) -> Outcome {
        let mut current = input;

        for (step_index, step) in flow.steps().iter().enumerate() {
            debug!(flow = %flow.name(), step_index, step_kind = step.kind(), "running step");

            let output = match self.run_step(step_index, step, current).await {
                Ok(output) => output,
                Err(outcome) => return outcome,
            };

            match output {
                Some(value) if !is_empty_output(Some(&value)) => current = value,
                _ => {
                    debug!(flow = %flow.name(), step_index, "step produced no output, halting");
                    return Outcome::Halted { step_index };
                }
            }
        }

        Outcome::Completed { value: current }
    }

    async fn run_step(
        &self,
        step_index: usize,
        step: &Step,
        input: JsonValue,
    ) -> Result<Option<JsonValue>, Outcome> {
        match step {
            Step::Receiver { receiver } => {
                let sink = self
                    .receivers
                    .get(receiver)
                    .ok_or_else(|| Outcome::UnknownReceiver {
                        name: receiver.clone(),
                    })?;
                sink.receive(input)
                    .await
                    .map_err(|e| Outcome::StepFailed {
                        step_index,
                        reason: e.to_string(),
                    })?;
                // Delivery ends the chain regardless of what the sink did.
                Ok(None)
            }
            Step::Transformer(transform) => {
                transform
                    .transform(input)
                    .await
                    .map_err(|e| Outcome::StepFailed {
                        step_index,
                        reason: e.to_string(),
                    })
            }
            Step::Unsupported { kind } => Err(Outcome::UnknownStepKind { kind: kind.clone() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReceiverError, StepError};
    use crate::receiver::{EventReceiver, MemoryReceiver};
    use crate::trigger::Trigger;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    #[async_trait]
    impl EventReceiver for Failing {
        async fn receive(&self, _value: JsonValue) -> Result<(), ReceiverError> {
            Err(ReceiverError::Unavailable {
                receiver: "failing".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn flow(steps: Vec<Step>) -> Flow {
        Flow::new("test", Trigger::webhook_any("/test")).with_steps(steps)
    }

    fn registry_with(name: &str, receiver: MemoryReceiver) -> ReceiverRegistry {
        let mut registry = ReceiverRegistry::new();
        registry.add(name, Arc::new(receiver));
        registry
    }

    #[tokio::test]
    async fn empty_flow_completes_with_input() {
        let receivers = ReceiverRegistry::new();
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(vec![]), json!({"a": 1}))
            .await;
        assert_eq!(outcome, Outcome::Completed { value: json!({"a": 1}) });
    }

    #[tokio::test]
    async fn transforms_thread_output_into_next_step() {
        let receivers = ReceiverRegistry::new();
        let steps = vec![
            Step::map(|v| json!(v.as_i64().unwrap_or_default() + 1)),
            Step::map(|v| json!(v.as_i64().unwrap_or_default() * 10)),
        ];
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(steps), json!(1))
            .await;
        assert_eq!(outcome, Outcome::Completed { value: json!(20) });
    }

    #[tokio::test]
    async fn receiver_gets_transformed_value_and_halts() {
        let sink = MemoryReceiver::new();
        let receivers = registry_with("sink", sink.clone());
        let steps = vec![Step::map(|_| json!({"someState": 4})), Step::receiver("sink")];

        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(steps), json!({"someState": 1}))
            .await;

        assert_eq!(outcome, Outcome::Halted { step_index: 1 });
        assert_eq!(sink.received(), vec![json!({"someState": 4})]);
    }

    #[tokio::test]
    async fn falsy_transform_output_halts_before_later_steps() {
        let sink = MemoryReceiver::new();
        let receivers = registry_with("sink", sink.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let steps = vec![
            Step::map(|_| json!(false)),
            Step::map(move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                v
            }),
            Step::receiver("sink"),
        ];

        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(steps), json!({"x": 1}))
            .await;

        assert_eq!(outcome, Outcome::Halted { step_index: 0 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn consecutive_receivers_only_first_fires() {
        let first = MemoryReceiver::new();
        let second = MemoryReceiver::new();
        let mut receivers = registry_with("first", first.clone());
        receivers.add("second", Arc::new(second.clone()));

        let outcome = PipelineExecutor::new(&receivers)
            .run(
                &flow(vec![Step::receiver("first"), Step::receiver("second")]),
                json!({"n": 1}),
            )
            .await;

        assert_eq!(outcome, Outcome::Halted { step_index: 0 });
        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 0);
    }

    #[tokio::test]
    async fn unknown_receiver_is_reported() {
        let receivers = ReceiverRegistry::new();
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(vec![Step::receiver("ghost")]), json!({}))
            .await;
        assert_eq!(
            outcome,
            Outcome::UnknownReceiver {
                name: "ghost".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unsupported_step_is_reported() {
        let receivers = ReceiverRegistry::new();
        let steps = vec![
            Step::map(|v| v),
            Step::Unsupported {
                kind: "parallel".to_string(),
            },
        ];
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(steps), json!({"a": 1}))
            .await;
        assert_eq!(
            outcome,
            Outcome::UnknownStepKind {
                kind: "parallel".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transform_error_is_step_failed() {
        let receivers = ReceiverRegistry::new();
        let steps = vec![
            Step::map(|v| v),
            Step::try_map(|_| Err(StepError::failed("bad input"))),
        ];
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(steps), json!({"a": 1}))
            .await;
        assert_eq!(
            outcome,
            Outcome::StepFailed {
                step_index: 1,
                reason: "step failed: bad input".to_string()
            }
        );
    }

    #[tokio::test]
    async fn receiver_error_is_step_failed() {
        let mut receivers = ReceiverRegistry::new();
        receivers.add("failing", Arc::new(Failing));
        let outcome = PipelineExecutor::new(&receivers)
            .run(&flow(vec![Step::receiver("failing")]), json!({}))
            .await;
        match outcome {
            Outcome::StepFailed { step_index, reason } => {
                assert_eq!(step_index, 0);
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected step failure, got {other:?}"),
        }
    }
}
