//! GeoJSON zone models.
//!
//! Features and collections serialize with their GeoJSON `type` tag first,
//! followed by the remaining members, e.g.
//! `{"type":"Feature","properties":{...},"geometry":{...}}`.

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;

/// A GeoJSON position: longitude, latitude and an optional altitude.
pub type Position = Vec<f64>;

/// Zone classification, one per source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    Red,
    Blue,
}

impl ZoneClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl std::fmt::Display for ZoneClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// Parse GeoJSON geometry text as produced by `ST_AsGeoJSON`.
    ///
    /// Fails on empty input, on JSON that is not a geometry object, and on
    /// positions that do not carry at least two finite ordinates.
    pub fn parse(text: &str) -> Result<Self, ZoneError> {
        if text.trim().is_empty() {
            return Err(ZoneError::MalformedGeometry("empty geometry".to_string()));
        }

        let geometry: Geometry = serde_json::from_str(text)
            .map_err(|e| ZoneError::MalformedGeometry(e.to_string()))?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// GeoJSON type name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// All positions in this geometry, depth first.
    pub fn positions(&self) -> Vec<&Position> {
        match self {
            Self::Point { coordinates } => vec![coordinates],
            Self::MultiPoint { coordinates } | Self::LineString { coordinates } => {
                coordinates.iter().collect()
            }
            Self::MultiLineString { coordinates } | Self::Polygon { coordinates } => {
                coordinates.iter().flatten().collect()
            }
            Self::MultiPolygon { coordinates } => coordinates.iter().flatten().flatten().collect(),
            Self::GeometryCollection { geometries } => {
                geometries.iter().flat_map(|g| g.positions()).collect()
            }
        }
    }

    fn validate(&self) -> Result<(), ZoneError> {
        // An empty position is how `POINT EMPTY` comes out of ST_AsGeoJSON.
        for position in self.positions().into_iter().filter(|p| !p.is_empty()) {
            if position.len() < 2 || position.iter().any(|v| !v.is_finite()) {
                return Err(ZoneError::MalformedGeometry(format!(
                    "invalid position {:?} in {}",
                    position,
                    self.type_name()
                )));
            }
        }
        Ok(())
    }
}

/// Properties attached to every zone feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneProperties {
    pub color: Option<String>,
    pub restriction: Option<String>,
}

/// A GeoJSON Feature describing one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: ZoneProperties,
    pub geometry: Geometry,
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}
