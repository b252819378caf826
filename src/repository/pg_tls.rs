//! PostgreSQL TLS connection helpers using rustls.
//!
//! Provides the TLS connection setup used by the diesel-async pool. TLS is
//! required by default; use `--no-tls` or `ZONEQUERY_NO_TLS=1` to disable.

use diesel::ConnectionError;
use diesel_async::AsyncPgConnection;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use rustls::ClientConfig;
use tokio_postgres_rustls::MakeRustlsConnect;

use super::util::pg_error_message;

fn build_rustls_config() -> ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        tracing::warn!("Failed to load a native certificate: {}", err);
    }
    for cert in native.certs {
        root_store.add(cert).ok();
    }

    ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

pub fn make_tls_connector() -> MakeRustlsConnect {
    MakeRustlsConnect::new(build_rustls_config())
}

/// Connection setup callback for the pool: connects over TLS and hands the
/// client to diesel-async, which drives the connection task itself.
pub fn establish_tls_connection(
    url: &str,
) -> BoxFuture<'_, diesel::ConnectionResult<AsyncPgConnection>> {
    let fut = async {
        let tls = make_tls_connector();
        let (client, conn) = tokio_postgres::connect(url, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(pg_error_message(&e)))?;

        AsyncPgConnection::try_from_client_and_connection(client, conn).await
    };
    fut.boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_connector_builds() {
        let _ = make_tls_connector();
    }

    #[test]
    fn test_rustls_config_has_crypto_provider() {
        let config = build_rustls_config();
        assert!(!config.crypto_provider().cipher_suites.is_empty());
    }
}
