//! API Handlers Module
//!
//! HTTP handlers exposing cluster auto-discovery to the GUI.

use crate::error::DiscoveryError;
use crate::models::{ClusterConnectionDetails, NormalizedDatabase};
use crate::service::DiscoveryService;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Route of the cluster database listing
pub const CLUSTER_DATABASES_ROUTE: &str = "/api/v1/redis-enterprise/cluster/get-databases";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
}

/// Success response wrapper; failures are rendered by [`DiscoveryError`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Create the main router with all API routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(CLUSTER_DATABASES_ROUTE, post(get_cluster_databases))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Discover and normalize the databases of a cluster
pub async fn get_cluster_databases(
    State(state): State<AppState>,
    payload: Result<Json<ClusterConnectionDetails>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<NormalizedDatabase>>>, DiscoveryError> {
    let Json(details) = payload?;
    debug!("Discovery requested for cluster {}", details.address());

    let databases = state.discovery.get_databases(&details).await?;
    Ok(Json(ApiResponse::success(databases)))
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: crate::VERSION.to_string(),
    })
}
