//! Zone GeoJSON endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::AppState;
use crate::error::ZoneError;
use crate::models::{FeatureCollection, ZoneClass};

impl IntoResponse for ZoneError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), "Zone request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

async fn zone_collection(
    state: &AppState,
    class: ZoneClass,
) -> Result<Json<FeatureCollection>, ZoneError> {
    let collection = state.zones.collection(class).await?;
    Ok(Json(collection))
}

/// All red zones.
pub async fn red_zones(
    State(state): State<AppState>,
) -> Result<Json<FeatureCollection>, ZoneError> {
    zone_collection(&state, ZoneClass::Red).await
}

/// Blue zones that do not intersect any red zone.
pub async fn blue_zones(
    State(state): State<AppState>,
) -> Result<Json<FeatureCollection>, ZoneError> {
    zone_collection(&state, ZoneClass::Blue).await
}
