//! Error types for the flow crate.
//!
//! Errors split by the layer that can observe them:
//! - `StepError`: a transform could not produce its output
//! - `ReceiverError`: a sink failed to accept a value
//! - `SchemaError`: a schema document could not be compiled
//! - `FlowError`: a declarative flow could not be turned into a `Flow`
//!   (wraps lower errors via context)
//!
//! None of these surface from `Engine::ingest`, which reports failures as an
//! `Outcome`. They appear in the fallible construction APIs, wrapped in a
//! rootcause `Report`.

use std::fmt;

/// Errors raised by a transformer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// The transform ran but failed.
    Failed { reason: String },
}

impl StepError {
    /// Shorthand for [`StepError::Failed`].
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "step failed: {reason}"),
        }
    }
}

impl std::error::Error for StepError {}

/// Errors raised by an event receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverError {
    /// The sink could not be reached.
    Unavailable { receiver: String, reason: String },
    /// The sink was reached but refused the value.
    Rejected { receiver: String, reason: String },
}

impl fmt::Display for ReceiverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { receiver, reason } => {
                write!(f, "receiver '{receiver}' unavailable: {reason}")
            }
            Self::Rejected { receiver, reason } => {
                write!(f, "receiver '{receiver}' rejected value: {reason}")
            }
        }
    }
}

impl std::error::Error for ReceiverError {}

/// Errors from schema compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The document is not a usable JSON Schema.
    InvalidSchema { reason: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSchema { reason } => write!(f, "invalid schema: {reason}"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Errors turning a declarative flow document into a runnable flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The trigger's schema failed to compile.
    TriggerSchema { flow: String, reason: String },
    /// A trigger route must be non-empty and start with `/`.
    InvalidRoute { flow: String, route_id: String },
    /// A step declared with a known type is missing required fields.
    InvalidStep { flow: String, index: usize, reason: String },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggerSchema { flow, reason } => {
                write!(f, "flow '{flow}' has an invalid trigger schema: {reason}")
            }
            Self::InvalidRoute { flow, route_id } => {
                write!(f, "flow '{flow}' has an invalid route '{route_id}'")
            }
            Self::InvalidStep {
                flow,
                index,
                reason,
            } => write!(f, "flow '{flow}' has an invalid step {index}: {reason}"),
        }
    }
}

impl std::error::Error for FlowError {}
