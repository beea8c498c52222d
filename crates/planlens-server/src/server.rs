//! HTTP server setup

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ServerConfig;
use crate::routes::router;

/// Run the HTTP server.
pub async fn run(config: ServerConfig) -> Result<()> {
    let app = router(&config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        address = %listener.local_addr()?,
        max_body_bytes = config.max_body_bytes,
        max_depth = config.limits.max_depth,
        max_nodes = config.limits.max_nodes,
        "planlens listening"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
