//! Web server setup and routing

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api;
use crate::state::MockState;

/// Build the backend router
pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/devices", get(api::list_devices))
        .route("/api/scan", post(api::scan))
        .route("/api/pair", post(api::pair))
        .route("/api/connect", post(api::connect))
        .route("/api/disconnect", post(api::disconnect))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the mock backend on `bind` until the process exits
pub async fn run(state: Arc<MockState>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, "Starting mock backend");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Serve the mock backend on an ephemeral local port in the background
pub async fn spawn(state: Arc<MockState>) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = router(state);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Mock backend stopped");
        }
    });

    info!(address = %addr, "Mock backend listening");
    Ok(addr)
}
