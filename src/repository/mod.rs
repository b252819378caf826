//! Repository layer for database access.
//!
//! All zone reads go through Diesel raw SQL on pooled async PostgreSQL
//! connections.

pub mod models;
pub mod pg_tls;
pub mod pool;
pub mod util;
pub mod zones;

pub use models::ZoneRecord;
pub use pool::{DbError, PgPool, DEFAULT_MAX_CONNECTIONS};
pub use zones::{DieselZoneRepository, SchemaReport, ZoneStore, BLUE_TABLE, RED_TABLE};
