//! Webhook transport for hookflow.
//!
//! Maps `POST {prefix}/{path}` requests onto `Engine::ingest("/{path}", body)`
//! and reports the resulting outcome as the response. Receivers and flows are
//! declared in configuration.

pub mod app;
pub mod config;
pub mod error;
pub mod receivers;
pub mod routes;

pub use app::build_engine;
pub use config::WebhookConfig;
pub use error::WebhookError;
