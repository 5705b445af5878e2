//! Flow execution engine for hookflow.
//!
//! Inbound events are routed into declared flows:
//!
//! - **Triggers**: bind a flow to a route id and a payload schema
//! - **Schema validation**: pluggable [`SchemaValidator`]s, with a JSON Schema adapter
//! - **Steps**: transformers and receiver hand-offs, run strictly in order
//! - **Engine**: flow/receiver registration and [`Engine::ingest`], which
//!   reports every ingestion as an [`Outcome`]
//! - **Documents**: serde-loadable flow declarations for configuration files

pub mod definition;
pub mod document;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod outcome;
pub mod pipeline;
pub mod receiver;
pub mod registry;
pub mod schema;
pub mod step;
pub mod trigger;

pub use definition::Flow;
pub use document::{FlowDocument, StepDocument, TriggerDocument};
pub use engine::Engine;
pub use error::{FlowError, ReceiverError, SchemaError, StepError};
pub use matcher::TriggerMatcher;
pub use outcome::Outcome;
pub use pipeline::PipelineExecutor;
pub use receiver::{EventReceiver, LogReceiver, MemoryReceiver, ReceiverRegistry};
pub use registry::FlowRegistry;
pub use schema::{AcceptAll, FnValidator, JsonSchemaValidator, SchemaValidator, Validation};
pub use step::{FnTransform, Step, Transform};
pub use trigger::{Trigger, TriggerKind};
