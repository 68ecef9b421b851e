//! MongoDB bootstrap: build a client, prove the server answers, hand out a
//! collection handle.
//!
//! Both failure kinds are meant to be fatal; the tool is unusable without a
//! store, so callers report the error and exit.

use std::time::Duration;

use mongodb::{bson::doc, error::ErrorKind, options::ClientOptions, Client, Collection, Database};
use shelf_kernel::DatabaseSettings;
use thiserror::Error;

/// Startup failures while reaching the document store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(
        "could not reach MongoDB at {hosts} within {timeout_ms} ms; \
         check that the server is running and the URI is correct"
    )]
    ConnectionTimeout {
        hosts: String,
        timeout_ms: u64,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("unexpected error while connecting to MongoDB at {hosts}: {source}")]
    Connection {
        hosts: String,
        #[source]
        source: mongodb::error::Error,
    },
}

impl DbError {
    fn from_driver(source: mongodb::error::Error, hosts: &str, timeout_ms: u64) -> Self {
        match source.kind.as_ref() {
            ErrorKind::ServerSelection { .. } => DbError::ConnectionTimeout {
                hosts: hosts.to_string(),
                timeout_ms,
                source,
            },
            _ => DbError::Connection {
                hosts: hosts.to_string(),
                source,
            },
        }
    }
}

/// Connect, ping, and return the configured database.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, DbError> {
    let timeout_ms = settings.server_selection_timeout_ms;

    // Credentials stay out of logs and messages; only the host list is shown.
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .map_err(|e| DbError::from_driver(e, "<unparsed uri>", timeout_ms))?;
    let hosts = options
        .hosts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    options.server_selection_timeout = Some(Duration::from_millis(timeout_ms));
    options.connect_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
    options.app_name = Some(settings.app_name.clone());

    tracing::info!(
        target: "shelf-db",
        hosts = %hosts,
        database = %settings.name,
        timeout_ms,
        "connecting to MongoDB"
    );

    let client =
        Client::with_options(options).map_err(|e| DbError::from_driver(e, &hosts, timeout_ms))?;
    let database = client.database(&settings.name);

    if let Err(e) = database.run_command(doc! { "ping": 1 }).await {
        let err = DbError::from_driver(e, &hosts, timeout_ms);
        tracing::error!(target: "shelf-db", error = %err, "MongoDB is not reachable");
        return Err(err);
    }

    tracing::info!(target: "shelf-db", hosts = %hosts, "MongoDB connection verified");
    Ok(database)
}

/// Connect and return the configured collection, typed as `T`.
pub async fn acquire_collection<T>(settings: &DatabaseSettings) -> Result<Collection<T>, DbError>
where
    T: Send + Sync,
{
    let database = connect(settings).await?;
    Ok(database.collection::<T>(&settings.collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Document;

    fn settings(uri: &str) -> DatabaseSettings {
        DatabaseSettings {
            uri: uri.to_string(),
            server_selection_timeout_ms: 200,
            connect_timeout_ms: 200,
            ..DatabaseSettings::default()
        }
    }

    #[tokio::test]
    async fn malformed_uri_is_a_connection_error() {
        let err = acquire_collection::<Document>(&settings("not-a-mongodb-uri"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_server_times_out() {
        let err = acquire_collection::<Document>(&settings("mongodb://127.0.0.1:1/"))
            .await
            .unwrap_err();
        match err {
            DbError::ConnectionTimeout { hosts, timeout_ms, .. } => {
                assert_eq!(hosts, "127.0.0.1:1");
                assert_eq!(timeout_ms, 200);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
