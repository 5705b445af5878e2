//! Error types for the webhook server.
//!
//! Failures here happen before or around serving: loading configuration,
//! turning it into an engine, and binding the listener. Event processing
//! never produces these; it reports an `Outcome` instead.

use std::fmt;

/// Errors from server startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// Configuration could not be read or deserialized.
    ConfigLoad { reason: String },
    /// A configured flow could not be compiled.
    InvalidFlow { flow: String, reason: String },
    /// An HTTP receiver's client could not be built.
    HttpClient { receiver: String, reason: String },
    /// The listen address could not be bound.
    Bind { addr: String, reason: String },
    /// The server stopped with an error.
    Serve { reason: String },
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigLoad { reason } => write!(f, "failed to load configuration: {reason}"),
            Self::InvalidFlow { flow, reason } => {
                write!(f, "configured flow '{flow}' is invalid: {reason}")
            }
            Self::HttpClient { receiver, reason } => {
                write!(f, "failed to build HTTP client for receiver '{receiver}': {reason}")
            }
            Self::Bind { addr, reason } => write!(f, "failed to bind {addr}: {reason}"),
            Self::Serve { reason } => write!(f, "server error: {reason}"),
        }
    }
}

impl std::error::Error for WebhookError {}
