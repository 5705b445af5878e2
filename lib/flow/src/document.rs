//! Declarative flow documents.
//!
//! Flows loaded from configuration can only deliver to receivers: transforms
//! are code. Steps of any other type are kept as `Step::Unsupported` and are
//! reported when an event reaches them, not when the document is loaded. A
//! `receiver` step without a string `receiver` field fails the load.

use crate::definition::Flow;
use crate::error::FlowError;
use crate::schema::JsonSchemaValidator;
use crate::step::Step;
use crate::trigger::{Trigger, TriggerKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Serializable description of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub name: String,
    pub trigger: TriggerDocument,
    #[serde(default)]
    pub steps: Vec<StepDocument>,
}

/// Serializable trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDocument {
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    /// Route the trigger listens on, e.g. `/orders`.
    pub path: String,
    /// JSON Schema for the payload. Defaults to `{}` (accept anything).
    #[serde(default = "default_schema")]
    pub schema: JsonValue,
}

fn default_schema() -> JsonValue {
    JsonValue::Object(Default::default())
}

/// Serializable step.
///
/// Anything other than `{"type": "receiver", "receiver": ...}` is captured
/// verbatim. [`FlowDocument::into_flow`] rejects captured steps whose type is
/// `receiver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepDocument {
    Receiver {
        #[serde(rename = "type")]
        kind: ReceiverTag,
        receiver: String,
    },
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(flatten)]
        rest: serde_json::Map<String, JsonValue>,
    },
}

/// Tag value for receiver steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverTag {
    Receiver,
}

impl StepDocument {
    /// A receiver step document.
    #[must_use]
    pub fn receiver(name: impl Into<String>) -> Self {
        Self::Receiver {
            kind: ReceiverTag::Receiver,
            receiver: name.into(),
        }
    }

    fn into_step(self, flow: &str, index: usize) -> Result<Step, FlowError> {
        match self {
            Self::Receiver { receiver, .. } => Ok(Step::Receiver { receiver }),
            Self::Other { kind, .. } if kind == "receiver" => Err(FlowError::InvalidStep {
                flow: flow.to_string(),
                index,
                reason: "receiver steps need a string `receiver` field".to_string(),
            }),
            Self::Other { kind, .. } => Ok(Step::Unsupported { kind }),
        }
    }
}

impl FlowDocument {
    /// Compiles the document into a runnable flow.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidRoute` if the path does not start with
    /// `/`, `FlowError::TriggerSchema` if the schema does not compile, and
    /// `FlowError::InvalidStep` for a malformed receiver step.
    pub fn into_flow(self) -> hookflow_core::Result<Flow, FlowError> {
        if !self.trigger.path.starts_with('/') {
            return Err(FlowError::InvalidRoute {
                flow: self.name,
                route_id: self.trigger.path,
            }
            .into());
        }

        let schema = JsonSchemaValidator::new(self.trigger.schema).map_err(|e| {
            FlowError::TriggerSchema {
                flow: self.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let trigger = match self.trigger.kind {
            TriggerKind::Webhook => Trigger::webhook(self.trigger.path, Arc::new(schema)),
        };

        let steps = self
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| step.into_step(&self.name, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Flow::new(self.name, trigger).with_steps(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_and_compiles_receiver_flow() {
        let doc: FlowDocument = serde_json::from_value(json!({
            "name": "gsh",
            "trigger": {
                "type": "webhook",
                "path": "/gsh",
                "schema": {
                    "type": "object",
                    "properties": { "someState": { "type": "number" } }
                }
            },
            "steps": [{ "type": "receiver", "receiver": "testReceiver" }]
        }))
        .expect("deserialize");

        assert_eq!(doc.steps, vec![StepDocument::receiver("testReceiver")]);

        let flow = doc.into_flow().expect("compile");
        assert_eq!(flow.trigger().route_id(), "/gsh");
        assert_eq!(flow.receiver_names(), vec!["testReceiver"]);
    }

    #[test]
    fn unknown_step_types_load_as_unsupported() {
        let doc: FlowDocument = serde_json::from_value(json!({
            "name": "branchy",
            "trigger": { "type": "webhook", "path": "/branchy" },
            "steps": [{ "type": "branch", "when": "x > 1" }]
        }))
        .expect("deserialize");

        let flow = doc.into_flow().expect("compile");
        assert!(matches!(
            &flow.steps()[0],
            Step::Unsupported { kind } if kind == "branch"
        ));
    }

    #[test]
    fn misspelled_receiver_field_fails_to_compile() {
        let doc: FlowDocument = serde_json::from_value(json!({
            "name": "typo",
            "trigger": { "type": "webhook", "path": "/typo" },
            "steps": [
                { "type": "receiver", "receiver": "log" },
                { "type": "receiver", "reciever": "log" }
            ]
        }))
        .expect("deserialize");

        let err = doc.into_flow().unwrap_err();
        assert!(err.to_string().contains("invalid step 1"));
    }

    #[test]
    fn receiver_step_without_name_fails_to_compile() {
        let doc: FlowDocument = serde_json::from_value(json!({
            "name": "unnamed",
            "trigger": { "type": "webhook", "path": "/unnamed" },
            "steps": [{ "type": "receiver", "receiver": 7 }]
        }))
        .expect("deserialize");

        let err = doc.into_flow().unwrap_err();
        assert!(err.to_string().contains("invalid step 0"));
    }

    #[test]
    fn schema_defaults_to_accept_anything() {
        let doc: FlowDocument = serde_json::from_value(json!({
            "name": "open",
            "trigger": { "type": "webhook", "path": "/open" }
        }))
        .expect("deserialize");
        assert_eq!(doc.trigger.schema, json!({}));
        assert!(doc.steps.is_empty());
    }

    #[test]
    fn rejects_relative_route() {
        let doc = FlowDocument {
            name: "bad".to_string(),
            trigger: TriggerDocument {
                kind: TriggerKind::Webhook,
                path: "bad".to_string(),
                schema: json!({}),
            },
            steps: vec![],
        };
        let err = doc.into_flow().unwrap_err();
        assert!(err.to_string().contains("invalid route"));
    }

    #[test]
    fn rejects_invalid_schema() {
        let doc = FlowDocument {
            name: "bad".to_string(),
            trigger: TriggerDocument {
                kind: TriggerKind::Webhook,
                path: "/bad".to_string(),
                schema: json!({"type": 12}),
            },
            steps: vec![],
        };
        let err = doc.into_flow().unwrap_err();
        assert!(err.to_string().contains("invalid trigger schema"));
    }
}
