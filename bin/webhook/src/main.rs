use hookflow_webhook::{WebhookConfig, WebhookError, build_engine, routes};
use rootcause::prelude::Report;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Report<WebhookError>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WebhookConfig::from_env()?;
    tracing::info!("Loaded configuration");

    let engine = Arc::new(build_engine(&config)?);
    let app = routes::router(engine, config.normalized_prefix());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| WebhookError::Bind {
            addr: config.listen_addr.clone(),
            reason: e.to_string(),
        })?;

    tracing::info!(
        "listening on http://{}{}/",
        config.listen_addr,
        config.normalized_prefix()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebhookError::Serve {
            reason: e.to_string(),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
