//! Liveness endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Status reported by the health endpoint.
pub const HEALTH_STATUS: &str = "Backend is running!";

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check. Never touches the database.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
    })
}
