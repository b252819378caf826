//! Data models for zonequery.

mod zone;

pub use zone::{Feature, FeatureCollection, Geometry, Position, ZoneClass, ZoneProperties};
