//! HTTP request handlers for the web server.

mod health;
mod zones;

// Re-export handlers for use by the router
pub use health::{health, HealthResponse, HEALTH_STATUS};
pub use zones::{blue_zones, red_zones};
