//! zonequery - GeoJSON zone query API.
//!
//! Serves red and blue zone polygons stored in PostGIS as GeoJSON
//! FeatureCollections. Blue zones are only returned when they do not
//! intersect any red zone.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod server;

pub use error::ZoneError;
