use crate::crawler::Coordinator;
use crate::record::AccessPointRecord;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the API router
///
/// Query parameters are accepted and ignored.
pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/api/domains", get(current_domain))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(coordinator)
}

/// Always 200; the body is `null` when no access point is known
async fn current_domain(
    State(coordinator): State<Arc<Coordinator>>,
) -> Json<Option<AccessPointRecord>> {
    Json(coordinator.current_access_point().await)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
