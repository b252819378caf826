//! Error types for zone queries.

use thiserror::Error;

/// Errors that can occur while serving zones.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// No database connection could be obtained.
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// The database rejected or failed to execute a query.
    #[error("Zone query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// A geometry value was null or not valid GeoJSON.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),
}

impl ZoneError {
    /// Short machine-readable kind, used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Query(_) => "query",
            Self::MalformedGeometry(_) => "serialization",
        }
    }
}
