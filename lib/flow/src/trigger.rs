//! Triggers bind a flow to an inbound route.

use crate::schema::{AcceptAll, SchemaValidator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The kind of inbound event a trigger listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// HTTP webhook call.
    Webhook,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => write!(f, "webhook"),
        }
    }
}

/// Entry point of a flow.
///
/// Events are matched on `route_id` by exact string equality.
#[derive(Clone)]
pub struct Trigger {
    kind: TriggerKind,
    route_id: String,
    schema: Arc<dyn SchemaValidator>,
}

impl Trigger {
    /// Creates a webhook trigger at `route_id` validated by `schema`.
    #[must_use]
    pub fn webhook(route_id: impl Into<String>, schema: Arc<dyn SchemaValidator>) -> Self {
        Self {
            kind: TriggerKind::Webhook,
            route_id: route_id.into(),
            schema,
        }
    }

    /// Creates a webhook trigger that accepts any payload.
    #[must_use]
    pub fn webhook_any(route_id: impl Into<String>) -> Self {
        Self::webhook(route_id, Arc::new(AcceptAll))
    }

    #[must_use]
    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    #[must_use]
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// The validator for this trigger's payloads.
    #[must_use]
    pub fn schema(&self) -> &dyn SchemaValidator {
        self.schema.as_ref()
    }

    /// Returns true if this trigger listens on `route_id`.
    #[must_use]
    pub fn matches(&self, route_id: &str) -> bool {
        self.route_id == route_id
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("kind", &self.kind)
            .field("route_id", &self.route_id)
            .finish_non_exhaustive()
    }
}
