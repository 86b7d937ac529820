use sqlx::mysql::{MySql, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use std::time::Duration;
use thiserror::Error;

use crate::connection_string::ConnectionString;
use crate::server_version::ServerVersion;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.connection_error")]
    ConnectionError,
}

/// Configuration for the database connection
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection_string: ConnectionString,
    pub server_version: ServerVersion,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default pool values
    pub fn new(connection_string: ConnectionString, server_version: ServerVersion) -> Self {
        Self {
            connection_string,
            server_version,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }
}

/// Hands out database contexts backed by a lazily connected MySQL pool.
///
/// Creating the factory opens no connection; the first `create_context`
/// call does. It must be created inside a tokio runtime.
pub struct DbContextFactory {
    pool: MySqlPool,
    server_version: ServerVersion,
}

impl DbContextFactory {
    pub fn new(config: &DatabaseConfig) -> Self {
        tracing::debug!(
            data_source = %config.connection_string,
            server_version = %config.server_version,
            max_connections = config.max_connections,
            "Registering lazy MySQL pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(config.connection_string.connect_options());

        Self {
            pool,
            server_version: config.server_version,
        }
    }

    /// Obtains a context for a single unit of work.
    pub async fn create_context(&self) -> Result<DbContext, DatabaseError> {
        let connection = self.pool.acquire().await.map_err(|e| {
            tracing::warn!("Failed to acquire database connection: {e}");
            DatabaseError::ConnectionError
        })?;

        Ok(DbContext {
            connection,
            server_version: self.server_version,
        })
    }

    pub fn server_version(&self) -> ServerVersion {
        self.server_version
    }
}

/// One pooled connection; returned to the pool on drop.
pub struct DbContext {
    connection: PoolConnection<MySql>,
    server_version: ServerVersion,
}

impl DbContext {
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.connection
    }

    pub fn server_version(&self) -> ServerVersion {
        self.server_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig::new(
            ConnectionString::parse("Server=127.0.0.1;Database=app;User=root").unwrap(),
            ServerVersion::default(),
        )
    }

    #[test]
    fn should_use_default_pool_settings() {
        let config = config();

        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn should_override_pool_settings() {
        let config = config()
            .with_max_connections(12)
            .with_acquire_timeout(Duration::from_secs(2));

        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn should_create_factory_without_connecting() {
        // Arrange
        let config = config();

        // Act
        let factory = DbContextFactory::new(&config);

        // Assert
        assert_eq!(factory.server_version(), ServerVersion::default());
        assert_eq!(factory.pool.size(), 0);
    }
}
