use std::{str::FromStr, time::Duration};

use bb8::{Pool, PooledConnection};
use bb8_postgres::PostgresConnectionManager;
use tokio_postgres::NoTls;

use crate::config::Database;

pub type Connection<'a> = PooledConnection<'a, PostgresConnectionManager<NoTls>>;
pub type ConnectionPool = Pool<PostgresConnectionManager<NoTls>>;

/// Build the connection pool described by `config`.
///
/// Connections are checked out per operation and go back to the pool when
/// the guard drops, on success or failure.
pub async fn connect(config: &Database) -> Result<ConnectionPool, tokio_postgres::Error> {
    let tokio_config = tokio_postgres::config::Config::from_str(&config.connection_string())?;

    let pg_mgr: PostgresConnectionManager<NoTls> =
        PostgresConnectionManager::new(tokio_config, NoTls);

    Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
        .build(pg_mgr)
        .await
}
