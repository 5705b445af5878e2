//! HTTP routes: one catch-all webhook endpoint plus a health check.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use crate::config::HEALTH_ROUTE;
use hookflow_flow::{Engine, Outcome};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the router.
///
/// `route_prefix` must be empty or start with `/`, and must not end with
/// `/`; [`crate::config::WebhookConfig::normalized_prefix`] of a validated
/// configuration satisfies this.
pub fn router(engine: Arc<Engine>, route_prefix: &str) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(&format!("{route_prefix}/{{*path}}"), post(ingest))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Ingests the JSON body under route id `/{path}`.
async fn ingest(
    State(engine): State<Arc<Engine>>,
    Path(path): Path<String>,
    Json(payload): Json<JsonValue>,
) -> (StatusCode, Json<Outcome>) {
    let route_id = format!("/{path}");
    let outcome = engine.ingest(&route_id, payload).await;
    (status_for(&outcome), Json(outcome))
}

/// Maps an outcome onto the response status.
#[must_use]
pub fn status_for(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::Completed { .. } | Outcome::Halted { .. } => StatusCode::OK,
        Outcome::NoMatchingFlow { .. } => StatusCode::NOT_FOUND,
        Outcome::SchemaRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::UnknownReceiver { .. }
        | Outcome::UnknownStepKind { .. }
        | Outcome::StepFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
