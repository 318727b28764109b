//! HTTP service around the `jwtseal` engine
//!
//! Endpoints:
//! - `POST /api/generate-token` signs a caller-supplied header and payload
//! - `POST /api/issue-token` signs a fixed-shape token for the configured API key
//! - `POST /api/verify-token` checks algorithm, signature and expiry
//! - `POST /api/decode-token` decodes without verification
//! - `GET /api/health` and `GET /`

use std::net::SocketAddr;

use anyhow::Result;
use axum::{http::Method, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::meta::index))
        .nest(
            "/api",
            routes::tokens::create_router().route("/health", get(routes::meta::health_check)),
        )
        .fallback(routes::meta::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Bind and serve until ctrl-c
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);

    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!("JWT Token Server is running on {local}");
    info!("API documentation: http://{local}/");
    info!("Health check: http://{local}/api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
