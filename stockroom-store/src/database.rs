use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info, warn};

use crate::app_config::DatabaseConfig;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS products (
        name   TEXT PRIMARY KEY,
        price  NUMERIC NOT NULL,
        stock  INTEGER NOT NULL,
        origin TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS perishable_extension (
        name            TEXT NOT NULL,
        expiration_date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS manufactured_extension (
        name             TEXT NOT NULL,
        manufacture_date DATE NOT NULL
    )
    "#,
];

/// Connection settings for the product store. Holds no live connection;
/// every caller opens its own and hands it back through [`Database::release`].
#[derive(Debug, Clone)]
pub struct Database {
    options: PgConnectOptions,
}

impl Database {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        debug!(
            host = self.options.get_host(),
            database = ?self.options.get_database(),
            "opening connection"
        );
        PgConnection::connect_with(&self.options).await
    }

    /// Close `conn`, logging rather than propagating a failed goodbye.
    pub async fn release(&self, conn: PgConnection) {
        match conn.close().await {
            Ok(()) => debug!("connection closed"),
            Err(e) => warn!(error = %e, "failed to close connection cleanly"),
        }
    }

    /// Create the base and extension tables when missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.connect().await?;
        let result = apply_schema(&mut conn).await;
        self.release(conn).await;
        result?;
        info!("product schema ready");
        Ok(())
    }
}

async fn apply_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}
