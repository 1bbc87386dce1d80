//! Durable store connection management.
//!
//! Two acquisition strategies are supported. `per_lookup` opens a fresh
//! connection for every lookup and closes it afterwards. `pooled` borrows
//! from a shared `MySqlPool`.

use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{ConnectOptions, Connection, MySql};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};
use usercache_config::{ConnectionMode, DatabaseConfig};
use usercache_core::{Interface, UserCacheError, UserCacheResult};

/// A connection handed out by a [`ConnectionProvider`].
///
/// Must be given back through [`ConnectionProvider::release`].
pub enum DbConnection {
    /// A dedicated connection, closed on release.
    Direct(MySqlConnection),
    /// A pool checkout, returned to the pool on release.
    Pooled(PoolConnection<MySql>),
}

impl DbConnection {
    /// Returns the underlying connection for running queries.
    pub fn connection_mut(&mut self) -> &mut MySqlConnection {
        match self {
            Self::Direct(conn) => conn,
            Self::Pooled(conn) => &mut **conn,
        }
    }
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("DbConnection::Direct"),
            Self::Pooled(_) => f.write_str("DbConnection::Pooled"),
        }
    }
}

/// Interface for obtaining durable store connections.
#[async_trait]
pub trait ConnectionProvider: Interface + Send + Sync {
    /// Returns the acquisition strategy in use.
    fn mode(&self) -> ConnectionMode;

    /// Obtains a connection.
    async fn acquire(&self) -> UserCacheResult<DbConnection>;

    /// Gives a connection back. Never fails; close errors are logged.
    async fn release(&self, conn: DbConnection);

    /// Runs `SELECT 1` on a fresh acquisition.
    async fn health_check(&self) -> UserCacheResult<()>;

    /// Closes the pool, if any.
    async fn close(&self);
}

/// MySQL connection provider.
#[derive(Component)]
#[shaku(interface = ConnectionProvider)]
pub struct DatabaseConnector {
    pool: Option<MySqlPool>,
    options: Option<MySqlConnectOptions>,
    connect_timeout: Duration,
}

impl DatabaseConnector {
    /// Creates a connector from configuration.
    ///
    /// In `pooled` mode the pool is established eagerly. In `per_lookup` mode
    /// only the URL is parsed; no connection is made until the first lookup.
    pub async fn connect(config: &DatabaseConfig) -> UserCacheResult<Self> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| UserCacheError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        match config.connection_mode {
            ConnectionMode::PerLookup => {
                info!("Using per-lookup MySQL connections");
                Ok(Self::per_lookup(options, config.connect_timeout()))
            }
            ConnectionMode::Pooled => {
                info!("Connecting to MySQL database...");

                let pool = MySqlPoolOptions::new()
                    .min_connections(config.min_connections)
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.connect_timeout())
                    .idle_timeout(Some(config.idle_timeout()))
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        warn!("Failed to connect to database: {}", e);
                        UserCacheError::store_unavailable(format!("Failed to connect: {}", e))
                    })?;

                info!("MySQL connection pool established");
                Ok(Self::pooled(pool, config.connect_timeout()))
            }
        }
    }

    /// Creates a connector that opens one connection per acquisition.
    #[must_use]
    pub fn per_lookup(options: MySqlConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            pool: None,
            options: Some(options),
            connect_timeout,
        }
    }

    /// Creates a connector over an existing pool.
    #[must_use]
    pub fn pooled(pool: MySqlPool, connect_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            options: None,
            connect_timeout,
        }
    }

    /// Converts into Shaku component parameters.
    #[must_use]
    pub fn into_parameters(self) -> DatabaseConnectorParameters {
        DatabaseConnectorParameters {
            pool: self.pool,
            options: self.options,
            connect_timeout: self.connect_timeout,
        }
    }

    async fn open_direct(&self, options: &MySqlConnectOptions) -> UserCacheResult<MySqlConnection> {
        match tokio::time::timeout(self.connect_timeout, MySqlConnection::connect_with(options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                warn!("Failed to connect to database: {}", e);
                Err(UserCacheError::store_unavailable(format!(
                    "Failed to connect: {}",
                    e
                )))
            }
            Err(_) => {
                warn!(
                    "Timed out connecting to database after {:?}",
                    self.connect_timeout
                );
                Err(UserCacheError::store_unavailable("Connection timed out"))
            }
        }
    }
}

#[async_trait]
impl ConnectionProvider for DatabaseConnector {
    fn mode(&self) -> ConnectionMode {
        if self.pool.is_some() {
            ConnectionMode::Pooled
        } else {
            ConnectionMode::PerLookup
        }
    }

    async fn acquire(&self) -> UserCacheResult<DbConnection> {
        if let Some(pool) = &self.pool {
            let conn = pool.acquire().await.map_err(|e| {
                warn!("Failed to acquire pooled connection: {}", e);
                UserCacheError::store_unavailable(format!("Failed to acquire connection: {}", e))
            })?;
            return Ok(DbConnection::Pooled(conn));
        }

        let options = self
            .options
            .as_ref()
            .ok_or_else(|| UserCacheError::Configuration("Database is not configured".into()))?;
        let conn = self.open_direct(options).await?;
        debug!("Opened per-lookup database connection");
        Ok(DbConnection::Direct(conn))
    }

    async fn release(&self, conn: DbConnection) {
        match conn {
            DbConnection::Direct(conn) => {
                if let Err(e) = conn.close().await {
                    warn!("Failed to close database connection: {}", e);
                }
            }
            DbConnection::Pooled(conn) => drop(conn),
        }
    }

    async fn health_check(&self) -> UserCacheResult<()> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("SELECT 1")
            .execute(conn.connection_mut())
            .await
            .map_err(|e| UserCacheError::store_unavailable(format!("Health check failed: {}", e)));
        self.release(conn).await;
        result.map(|_| ())
    }

    async fn close(&self) {
        if let Some(pool) = &self.pool {
            info!("Closing database connection pool...");
            pool.close().await;
            info!("Database connection pool closed");
        }
    }
}

impl std::fmt::Debug for DatabaseConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("DatabaseConnector");
        s.field("mode", &self.mode());
        if let Some(pool) = &self.pool {
            s.field("size", &pool.size()).field("num_idle", &pool.num_idle());
        }
        s.finish()
    }
}
