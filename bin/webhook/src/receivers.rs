//! Receivers that can be declared in configuration.

use crate::config::ReceiverConfig;
use crate::error::WebhookError;
use async_trait::async_trait;
use hookflow_flow::{EventReceiver, LogReceiver, ReceiverError};
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Forwards values to an HTTP endpoint as a JSON `POST`.
#[derive(Debug, Clone)]
pub struct HttpReceiver {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpReceiver {
    /// Creates a receiver posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Report<WebhookError>> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::HttpClient {
                receiver: name.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            name,
            url: url.into(),
            client,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventReceiver for HttpReceiver {
    async fn receive(&self, value: JsonValue) -> Result<(), ReceiverError> {
        let response = self
            .client
            .post(&self.url)
            .json(&value)
            .send()
            .await
            .map_err(|e| ReceiverError::Unavailable {
                receiver: self.name.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReceiverError::Rejected {
                receiver: self.name.clone(),
                reason: format!("status {status}"),
            });
        }

        debug!(receiver = %self.name, %status, "forwarded event");
        Ok(())
    }
}

/// Builds the receiver described by `config`.
///
/// # Errors
///
/// Returns an error if an HTTP receiver's client cannot be built.
pub fn build_receiver(config: &ReceiverConfig) -> Result<Arc<dyn EventReceiver>, Report<WebhookError>> {
    let receiver: Arc<dyn EventReceiver> = match config {
        ReceiverConfig::Log { name } => Arc::new(LogReceiver::new(name.clone())),
        ReceiverConfig::Http {
            name,
            url,
            timeout_seconds,
        } => Arc::new(HttpReceiver::new(
            name.clone(),
            url.clone(),
            Duration::from_secs(*timeout_seconds),
        )?),
    };
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookflow_flow::MemoryReceiver;
    use serde_json::json;

    #[test]
    fn builds_http_receiver() {
        let receiver = HttpReceiver::new(
            "forward",
            "http://localhost:9000/events",
            Duration::from_secs(1),
        )
        .expect("client");
        assert_eq!(receiver.url(), "http://localhost:9000/events");
    }

    async fn spawn_endpoint(status: axum::http::StatusCode) -> (String, MemoryReceiver) {
        let seen = MemoryReceiver::new();
        let recorder = seen.clone();
        let app = axum::Router::new().route(
            "/events",
            axum::routing::post(move |axum::Json(body): axum::Json<JsonValue>| {
                let recorder = recorder.clone();
                async move {
                    recorder.receive(body).await.expect("record");
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move { axum::serve(listener, app).await });
        (format!("http://{addr}/events"), seen)
    }

    #[tokio::test]
    async fn posts_value_as_json() {
        let (url, seen) = spawn_endpoint(axum::http::StatusCode::NO_CONTENT).await;
        let receiver = HttpReceiver::new("forward", url, Duration::from_secs(5)).expect("client");

        receiver.receive(json!({"n": 1})).await.expect("forward");

        assert_eq!(seen.received(), vec![json!({"n": 1})]);
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let (url, _) = spawn_endpoint(axum::http::StatusCode::BAD_GATEWAY).await;
        let receiver = HttpReceiver::new("forward", url, Duration::from_secs(5)).expect("client");

        let err = receiver.receive(json!({"n": 1})).await.unwrap_err();

        match err {
            ReceiverError::Rejected { reason, .. } => assert!(reason.contains("502")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_port_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let receiver = HttpReceiver::new("down", format!("http://{addr}/"), Duration::from_secs(1))
            .expect("client");
        let err = receiver.receive(json!({"n": 1})).await.unwrap_err();
        assert!(matches!(err, ReceiverError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn log_receiver_from_config_accepts_values() {
        let receiver = build_receiver(&ReceiverConfig::Log {
            name: "audit".to_string(),
        })
        .expect("build");
        receiver.receive(json!({"n": 1})).await.expect("receive");
    }
}
