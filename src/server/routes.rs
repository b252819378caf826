//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
///
/// CORS mirrors the caller's origin, method and headers and allows
/// credentials, since a literal `*` cannot be combined with credentials.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/zones/red", get(handlers::red_zones))
        .route("/zones/blue", get(handlers::blue_zones))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::very_permissive()),
        )
        .with_state(state)
}
