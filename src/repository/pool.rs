//! PostgreSQL connection pool.
//!
//! Every request checks out its own connection; nothing is shared between
//! concurrent handlers. Connections go back to the pool when dropped.

use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::AsyncPgConnection;

use super::pg_tls::establish_tls_connection;
use super::util::{redact_url_password, to_diesel_error};
use crate::error::ZoneError;

/// Diesel error type alias.
pub type DbError = diesel::result::Error;

/// Pooled async PostgreSQL connection.
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Default number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgPool {
    pool: DeadPool<AsyncPgConnection>,
}

impl PgPool {
    /// Create a new PostgreSQL pool.
    ///
    /// No connection is opened here; the first `get` establishes one.
    pub fn new(database_url: &str, max_size: usize, no_tls: bool) -> Result<Self, DbError> {
        let manager = if no_tls {
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url)
        } else {
            let mut config = ManagerConfig::default();
            config.custom_setup = Box::new(establish_tls_connection);
            AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
                database_url,
                config,
            )
        };

        let pool = DeadPool::builder(manager)
            .max_size(max_size.max(1))
            .build()
            .map_err(to_diesel_error)?;

        tracing::debug!(
            "Created pool for {} (max {} connections, tls: {})",
            redact_url_password(database_url),
            max_size.max(1),
            !no_tls
        );

        Ok(Self { pool })
    }

    /// Check out a connection.
    pub async fn get(&self) -> Result<PgConn, ZoneError> {
        self.pool
            .get()
            .await
            .map_err(|e| ZoneError::Connection(e.to_string()))
    }

    /// Maximum number of connections this pool will open.
    pub fn max_size(&self) -> usize {
        self.pool.status().max_size
    }
}
