use std::sync::Arc;

use anyhow::Context;

use quill_api::app::{build_app, build_services};
use quill_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quill_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = build_services(&config).await.context("failed to wire services")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
