//! Pipeline steps.
//!
//! A step either hands the current value to a named receiver (which always
//! ends the pipeline) or transforms it into the next value. A transform that
//! produces nothing drops the event; see [`is_empty_output`].

use crate::error::StepError;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Maps the current pipeline value to the next one.
#[async_trait]
pub trait Transform: Send + Sync {
    /// Produces the next value, or `None` to stop the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform cannot run on `input`. The
    /// ingestion is reported as a failed step.
    async fn transform(&self, input: JsonValue) -> Result<Option<JsonValue>, StepError>;
}

/// Adapts a synchronous closure into a [`Transform`].
pub struct FnTransform<F>(F);

impl<F> FnTransform<F>
where
    F: Fn(JsonValue) -> Result<Option<JsonValue>, StepError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Transform for FnTransform<F>
where
    F: Fn(JsonValue) -> Result<Option<JsonValue>, StepError> + Send + Sync,
{
    async fn transform(&self, input: JsonValue) -> Result<Option<JsonValue>, StepError> {
        (self.0)(input)
    }
}

/// One stage of a flow.
#[derive(Clone)]
pub enum Step {
    /// Forwards the current value to the named receiver, then halts.
    Receiver { receiver: String },
    /// Replaces the current value with the transform's output.
    Transformer(Arc<dyn Transform>),
    /// A step kind this build cannot run. Only produced by declarative
    /// flow documents; detected when the step is dispatched.
    Unsupported { kind: String },
}

impl Step {
    /// A step that delivers to the receiver registered as `name`.
    #[must_use]
    pub fn receiver(name: impl Into<String>) -> Self {
        Self::Receiver {
            receiver: name.into(),
        }
    }

    /// A step backed by an arbitrary (possibly async) transform.
    #[must_use]
    pub fn transformer(transform: Arc<dyn Transform>) -> Self {
        Self::Transformer(transform)
    }

    /// A transform that always produces a value.
    #[must_use]
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        Self::try_map(move |input| Ok(Some(f(input))))
    }

    /// A transform that may drop the event by returning `None`.
    #[must_use]
    pub fn filter_map<F>(f: F) -> Self
    where
        F: Fn(JsonValue) -> Option<JsonValue> + Send + Sync + 'static,
    {
        Self::try_map(move |input| Ok(f(input)))
    }

    /// A transform that may fail.
    #[must_use]
    pub fn try_map<F>(f: F) -> Self
    where
        F: Fn(JsonValue) -> Result<Option<JsonValue>, StepError> + Send + Sync + 'static,
    {
        Self::Transformer(Arc::new(FnTransform::new(f)))
    }

    /// Short name of the step kind, for logs and outcomes.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Receiver { .. } => "receiver",
            Self::Transformer(_) => "transformer",
            Self::Unsupported { kind } => kind,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver { receiver } => f
                .debug_struct("Receiver")
                .field("receiver", receiver)
                .finish(),
            Self::Transformer(_) => f.write_str("Transformer(..)"),
            Self::Unsupported { kind } => {
                f.debug_struct("Unsupported").field("kind", kind).finish()
            }
        }
    }
}

/// Returns true if a step output should halt the pipeline.
///
/// Empty means absent or falsy: `null`, `false`, `0`, or `""`. Empty
/// arrays and objects still carry a value and do not halt.
#[must_use]
pub fn is_empty_output(output: Option<&JsonValue>) -> bool {
    match output {
        None | Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => true,
        Some(JsonValue::Number(n)) => n.as_f64() == Some(0.0),
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(JsonValue::Array(_) | JsonValue::Object(_) | JsonValue::Bool(true)) => false,
    }
}
