//! Zone queries against PostGIS.
//!
//! Both queries are fixed statements. Reprojection to EPSG:4326 and the
//! red/blue intersection test run inside the database on every call.

use async_trait::async_trait;
use diesel::sql_types::{Bool, Text};
use diesel_async::RunQueryDsl;

use super::models::ZoneRecord;
use super::pool::PgPool;
use crate::error::ZoneError;
use crate::models::{Feature, FeatureCollection, ZoneClass};

/// Table holding red zones.
pub const RED_TABLE: &str = "red_small";
/// Table holding blue zones.
pub const BLUE_TABLE: &str = "blue_small";

const RED_ZONES_SQL: &str = r#"
    SELECT
      ST_AsGeoJSON(ST_Transform(geom, 4326)) AS geometry,
      zone_color::text AS color,
      restriction::text AS restriction
    FROM red_small
"#;

// ST_Intersects is true for shared boundaries too, so touching blue zones are dropped.
const BLUE_ZONES_SQL: &str = r#"
    SELECT
      ST_AsGeoJSON(ST_Transform(b.geom, 4326)) AS geometry,
      b.zone_color::text AS color,
      b.restriction::text AS restriction
    FROM blue_small b
    WHERE NOT EXISTS (
      SELECT 1
      FROM red_small r
      WHERE ST_Intersects(b.geom, r.geom)
    )
"#;

/// Source of zone rows.
#[async_trait]
pub trait ZoneStore: Send + Sync {
    /// Load the raw rows for one zone class.
    async fn load(&self, class: ZoneClass) -> Result<Vec<ZoneRecord>, ZoneError>;

    /// Load one zone class as a FeatureCollection.
    ///
    /// A single row with a null or malformed geometry fails the whole call.
    async fn collection(&self, class: ZoneClass) -> Result<FeatureCollection, ZoneError> {
        let records = self.load(class).await?;
        let count = records.len();

        let collection = records
            .into_iter()
            .map(Feature::try_from)
            .collect::<Result<FeatureCollection, _>>()?;

        tracing::debug!("Loaded {} {} zones", count, class);
        Ok(collection)
    }
}

/// Zone repository backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct DieselZoneRepository {
    pool: PgPool,
}

/// Result of a schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub postgis_version: String,
    pub red_table: bool,
    pub blue_table: bool,
}

impl SchemaReport {
    pub fn is_ready(&self) -> bool {
        self.red_table && self.blue_table
    }
}

#[derive(diesel::QueryableByName)]
struct PostgisVersion {
    #[diesel(sql_type = Text)]
    version: String,
}

#[derive(diesel::QueryableByName)]
struct TablePresent {
    #[diesel(sql_type = Bool)]
    present: bool,
}

impl DieselZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open one connection and run a trivial query.
    pub async fn check_connection(&self) -> Result<(), ZoneError> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// Report the PostGIS version and whether both zone tables exist.
    pub async fn check_schema(&self) -> Result<SchemaReport, ZoneError> {
        let mut conn = self.pool.get().await?;

        let version: PostgisVersion =
            diesel::sql_query("SELECT postgis_version() AS version")
                .get_result(&mut *conn)
                .await?;

        let mut present = [false; 2];
        for (slot, table) in present.iter_mut().zip([RED_TABLE, BLUE_TABLE]) {
            let row: TablePresent =
                diesel::sql_query("SELECT to_regclass($1) IS NOT NULL AS present")
                    .bind::<Text, _>(table)
                    .get_result(&mut *conn)
                    .await?;
            *slot = row.present;
        }

        Ok(SchemaReport {
            postgis_version: version.version,
            red_table: present[0],
            blue_table: present[1],
        })
    }
}

#[async_trait]
impl ZoneStore for DieselZoneRepository {
    async fn load(&self, class: ZoneClass) -> Result<Vec<ZoneRecord>, ZoneError> {
        let sql = match class {
            ZoneClass::Red => RED_ZONES_SQL,
            ZoneClass::Blue => BLUE_ZONES_SQL,
        };

        let mut conn = self.pool.get().await?;
        let rows = diesel::sql_query(sql)
            .load::<ZoneRecord>(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load {} zones: {}", class, e);
                ZoneError::Query(e)
            })?;

        Ok(rows)
    }
}
