//! HTTP API serving the current access point
//!
//! Routes:
//! - `GET /api/domains` - current access point record as JSON, or `null`
//! - `GET /health` - liveness probe

mod routes;

pub use routes::router;

use crate::crawler::Coordinator;
use crate::ScoutError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds `bind` and serves the API until `shutdown` resolves
///
/// # Arguments
///
/// * `bind` - Listen address, e.g. `127.0.0.1:3000`
/// * `coordinator` - Shared refresh coordinator backing the routes
/// * `shutdown` - Future that triggers graceful shutdown
pub async fn serve<F>(
    bind: SocketAddr,
    coordinator: Arc<Coordinator>,
    shutdown: F,
) -> Result<(), ScoutError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(coordinator))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
