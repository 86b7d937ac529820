use std::time::Duration;

use persistence::connection_string::ConnectionString;
use persistence::db::DatabaseConfig;
use persistence::server_version::{DEFAULT_SERVER_VERSION, ServerVersion};

use super::configuration::{Configuration, ConfigurationError};
use crate::setup::error::StartupError;

/// Name of the connection string under `ConnectionStrings`.
pub const CONNECTION_STRING_NAME: &str = "DefaultConnection";

/// Read database settings from the merged configuration
///
/// Keys:
/// - ConnectionStrings:DefaultConnection: MySQL connection string (required)
/// - Database:ServerVersion: engine descriptor (default: "8.0.34-mysql")
/// - Database:MaxConnections: pool size (default: 5)
/// - Database:AcquireTimeoutSeconds: pool acquire timeout (default: 30)
///
/// # Errors
/// Returns a configuration error if the connection string is missing, blank
/// or unparsable, and a version error if the descriptor cannot be parsed.
/// Nothing here touches the network.
pub fn load_database_config(config: &Configuration) -> Result<DatabaseConfig, StartupError> {
    let raw = config.require_connection_string(CONNECTION_STRING_NAME)?;
    let connection_string =
        ConnectionString::parse(raw).map_err(|e| ConfigurationError::InvalidValue {
            key: format!("ConnectionStrings:{CONNECTION_STRING_NAME}"),
            reason: e.to_string(),
        })?;

    let section = &config.database;
    let server_version = ServerVersion::parse(
        section
            .server_version
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_VERSION),
    )?;

    let mut database = DatabaseConfig::new(connection_string, server_version);
    if let Some(max_connections) = section.max_connections {
        database = database.with_max_connections(max_connections);
    }
    if let Some(seconds) = section.acquire_timeout_seconds {
        database = database.with_acquire_timeout(Duration::from_secs(seconds));
    }

    Ok(database)
}
