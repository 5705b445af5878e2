//! Terminal outcome of one ingestion.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// How far an event got, and why it stopped.
///
/// `Completed` and `Halted` are normal endings. Every other variant means the
/// event was not fully processed; none of them are raised as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Every step produced output; carries the last step's value.
    Completed { value: JsonValue },
    /// The step at `step_index` produced no output.
    Halted { step_index: usize },
    /// No flow listens on the route.
    NoMatchingFlow { route_id: String },
    /// The payload failed the trigger's schema. No step ran.
    SchemaRejected { detail: String },
    /// A receiver step names a receiver that is not registered.
    UnknownReceiver { name: String },
    /// A step has a kind this build cannot run.
    UnknownStepKind { kind: String },
    /// A transform or receiver returned an error.
    StepFailed { step_index: usize, reason: String },
}

impl Outcome {
    /// True for `Completed` and `Halted`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Halted { .. })
    }

    /// Stable snake_case name of the variant, for logs and metrics labels.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Halted { .. } => "halted",
            Self::NoMatchingFlow { .. } => "no_matching_flow",
            Self::SchemaRejected { .. } => "schema_rejected",
            Self::UnknownReceiver { .. } => "unknown_receiver",
            Self::UnknownStepKind { .. } => "unknown_step_kind",
            Self::StepFailed { .. } => "step_failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { .. } => write!(f, "completed"),
            Self::Halted { step_index } => write!(f, "halted at step {step_index}"),
            Self::NoMatchingFlow { route_id } => write!(f, "no flow matches route '{route_id}'"),
            Self::SchemaRejected { detail } => write!(f, "payload rejected: {detail}"),
            Self::UnknownReceiver { name } => write!(f, "unknown receiver '{name}'"),
            Self::UnknownStepKind { kind } => write!(f, "unknown step kind '{kind}'"),
            Self::StepFailed { step_index, reason } => {
                write!(f, "step {step_index} failed: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_variants() {
        assert!(Outcome::Completed { value: json!(1) }.is_success());
        assert!(Outcome::Halted { step_index: 0 }.is_success());
        assert!(
            !Outcome::SchemaRejected {
                detail: "x".to_string()
            }
            .is_success()
        );
    }

    #[test]
    fn serializes_with_outcome_tag() {
        let json = serde_json::to_value(Outcome::Halted { step_index: 2 }).expect("serialize");
        assert_eq!(json, json!({"outcome": "halted", "step_index": 2}));
    }

    #[test]
    fn display_names_the_cause() {
        let outcome = Outcome::UnknownReceiver {
            name: "audit".to_string(),
        };
        assert_eq!(outcome.to_string(), "unknown receiver 'audit'");
        assert_eq!(outcome.name(), "unknown_receiver");
    }
}
