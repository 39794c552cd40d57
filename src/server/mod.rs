//! HTTP boundary
//!
//! A thin JSON layer over [`InterviewOrchestrator`]: request validation and
//! error-to-status mapping live here, interview semantics do not.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::AppState;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::workflow::InterviewOrchestrator;

/// Build the API router
pub fn router(orchestrator: Arc<InterviewOrchestrator>) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::interview_routes())
        .with_state(orchestrator)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until the process is stopped
pub async fn serve(orchestrator: Arc<InterviewOrchestrator>, bind: SocketAddr) -> Result<()> {
    let app = router(orchestrator);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "Interview API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
