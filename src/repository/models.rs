//! Row types returned by the zone queries.

use diesel::sql_types::{Nullable, Text};

use crate::error::ZoneError;
use crate::models::{Feature, Geometry, ZoneProperties};

/// One zone row, with its geometry already serialized to GeoJSON text by
/// the database.
#[derive(diesel::QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    #[diesel(sql_type = Nullable<Text>)]
    pub geometry: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub color: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub restriction: Option<String>,
}

impl TryFrom<ZoneRecord> for Feature {
    type Error = ZoneError;

    fn try_from(record: ZoneRecord) -> Result<Self, Self::Error> {
        let text = record
            .geometry
            .ok_or_else(|| ZoneError::MalformedGeometry("geometry is null".to_string()))?;

        Ok(Feature {
            properties: ZoneProperties {
                color: record.color,
                restriction: record.restriction,
            },
            geometry: Geometry::parse(&text)?,
        })
    }
}
