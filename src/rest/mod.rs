// rest/mod.rs — Public chat API server.
//
// Axum HTTP server bridging the browser widget to the generation service.
//
// Endpoints:
//   POST /api/stream   (one chat turn → raw text byte stream)
//   GET  /health

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("chat API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health))
        // Chat stream relay
        .route("/api/stream", post(routes::stream::stream_chat))
        // The widget is served from another origin during development
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
