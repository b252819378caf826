//! Web server exposing zones as GeoJSON.
//!
//! Routes:
//! - `GET /` health probe
//! - `GET /zones/red` every red zone
//! - `GET /zones/blue` blue zones clear of all red zones

mod handlers;
mod routes;

pub use handlers::{HealthResponse, HEALTH_STATUS};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::repository::{DieselZoneRepository, PgPool, ZoneStore};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub zones: Arc<dyn ZoneStore>,
}

impl AppState {
    pub fn new(zones: Arc<dyn ZoneStore>) -> Self {
        Self { zones }
    }

    /// Build state from settings, checking that the database is reachable.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let pool = PgPool::new(
            &settings.database_url,
            settings.max_connections,
            settings.no_tls,
        )?;
        let repo = DieselZoneRepository::new(pool);

        repo.check_connection().await.map_err(|e| {
            anyhow::anyhow!(
                "Cannot reach database at {}: {}",
                settings.redacted_database_url(),
                e
            )
        })?;
        tracing::info!("Connected to {}", settings.redacted_database_url());

        Ok(Self::new(Arc::new(repo)))
    }
}

/// Start the web server and run until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::connect(settings).await?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::error::ZoneError;
    use crate::models::ZoneClass;
    use crate::repository::ZoneRecord;

    const INSIDE_RED: &str = r#"{"type":"Polygon","coordinates":[[[8.40,49.00],[8.41,49.00],[8.41,49.01],[8.40,49.00]]]}"#;
    const CLEAR_OF_RED: &str = r#"{"type":"Polygon","coordinates":[[[8.70,49.20],[8.71,49.20],[8.71,49.21],[8.70,49.20]]]}"#;
    const RED_AREA: &str = r#"{"type":"Polygon","coordinates":[[[8.3,48.9],[8.5,48.9],[8.5,49.1],[8.3,49.1],[8.3,48.9]]]}"#;

    /// In-memory zones; the blue list is what the database would return after filtering.
    struct MemoryStore {
        red: Vec<ZoneRecord>,
        blue: Vec<ZoneRecord>,
    }

    #[async_trait]
    impl ZoneStore for MemoryStore {
        async fn load(&self, class: ZoneClass) -> Result<Vec<ZoneRecord>, ZoneError> {
            Ok(match class {
                ZoneClass::Red => self.red.clone(),
                ZoneClass::Blue => self.blue.clone(),
            })
        }
    }

    struct DownStore;

    #[async_trait]
    impl ZoneStore for DownStore {
        async fn load(&self, _class: ZoneClass) -> Result<Vec<ZoneRecord>, ZoneError> {
            Err(ZoneError::Connection("connection refused".to_string()))
        }
    }

    fn zone(geometry: &str, color: &str, restriction: &str) -> ZoneRecord {
        ZoneRecord {
            geometry: Some(geometry.to_string()),
            color: Some(color.to_string()),
            restriction: Some(restriction.to_string()),
        }
    }

    fn setup_test_app(store: impl ZoneStore + 'static) -> axum::Router {
        create_router(AppState::new(Arc::new(store)))
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_test_app(MemoryStore {
            red: vec![],
            blue: vec![],
        });

        let (status, json) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "status": "Backend is running!" }));
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let (status, json) = get_json(setup_test_app(DownStore), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], HEALTH_STATUS);
    }

    #[tokio::test]
    async fn test_red_zones() {
        let app = setup_test_app(MemoryStore {
            red: vec![zone(RED_AREA, "red", "no consumption")],
            blue: vec![],
        });

        let (status, json) = get_json(app, "/zones/red").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "FeatureCollection");

        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["type"], "Feature");
        assert_eq!(features[0]["properties"]["color"], "red");
        assert_eq!(features[0]["properties"]["restriction"], "no consumption");
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["geometry"]["coordinates"][0][0][0], 8.3);
    }

    #[tokio::test]
    async fn test_blue_zones() {
        let app = setup_test_app(MemoryStore {
            red: vec![zone(RED_AREA, "red", "no consumption")],
            blue: vec![zone(CLEAR_OF_RED, "blue", "allowed")],
        });

        let (status, json) = get_json(app, "/zones/blue").await;
        assert_eq!(status, StatusCode::OK);
        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["color"], "blue");
        assert_eq!(features[0]["geometry"]["coordinates"][0][0][0], 8.7);
    }

    #[tokio::test]
    async fn test_blue_zones_empty() {
        let app = setup_test_app(MemoryStore {
            red: vec![zone(RED_AREA, "red", "no consumption")],
            blue: vec![],
        });

        let (status, json) = get_json(app, "/zones/blue").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({ "type": "FeatureCollection", "features": [] })
        );
    }

    #[tokio::test]
    async fn test_database_failure_is_server_error() {
        for uri in ["/zones/red", "/zones/blue"] {
            let (status, json) = get_json(setup_test_app(DownStore), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(json["error"]
                .as_str()
                .unwrap()
                .contains("connection refused"));
        }
    }

    #[tokio::test]
    async fn test_malformed_geometry_fails_request() {
        let mut broken = zone(RED_AREA, "red", "x");
        broken.geometry = None;
        let app = setup_test_app(MemoryStore {
            red: vec![zone(RED_AREA, "red", "no consumption"), broken],
            blue: vec![],
        });

        let (status, json) = get_json(app, "/zones/red").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("geometry"));
    }

    #[tokio::test]
    async fn test_repeated_calls_identical() {
        let app = setup_test_app(MemoryStore {
            red: vec![
                zone(RED_AREA, "red", "a"),
                zone(INSIDE_RED, "red", "b"),
            ],
            blue: vec![],
        });

        let (_, first) = get_json(app.clone(), "/zones/red").await;
        let (_, second) = get_json(app, "/zones/red").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = setup_test_app(DownStore);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/zones/green")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_mirrors_origin_with_credentials() {
        let app = setup_test_app(MemoryStore {
            red: vec![],
            blue: vec![],
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/zones/red")
                    .header(header::ORIGIN, "http://localhost:5500")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5500"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = setup_test_app(DownStore);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/zones/blue")
                    .header(header::ORIGIN, "https://maps.example.org")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-requested-with")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://maps.example.org"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "x-requested-with"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
