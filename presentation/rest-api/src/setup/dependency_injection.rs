use std::sync::Arc;

use business::application::health::check_readiness::CheckReadinessUseCaseImpl;
use logger::TracingLogger;
use persistence::db::DbContextFactory;
use persistence::health::probe::DatabaseProbeMySql;

use crate::api::Controllers;
use crate::api::health::routes::HealthApi;
use crate::config::configuration::Configuration;
use crate::config::database_config::load_database_config;
use crate::setup::container::{ApiInfo, ServiceRegistry};
use crate::setup::error::StartupError;

pub const API_TITLE: &str = "StudyMate API";

/// Registers every service the application needs.
///
/// Reads the database settings, so the configuration must be fully loaded.
/// Call once per process; nothing here opens a connection or a listener.
pub fn register_services(config: &Configuration) -> Result<ServiceRegistry, StartupError> {
    let database = load_database_config(config)?;
    tracing::info!(
        data_source = %database.connection_string,
        server_version = %database.server_version,
        "Registering services"
    );

    let mut services = ServiceRegistry::new();
    services
        .add_controllers()
        .add_endpoints_api_explorer()
        .add_api_schema_generator(ApiInfo::new(API_TITLE, env!("CARGO_PKG_VERSION")))
        .add_db_context(database);

    tracing::debug!(capabilities = ?services.capabilities(), "Services registered");
    Ok(services)
}

/// Wires adapters and use cases into the controller set.
pub(crate) fn wire_controllers(db_context: Arc<DbContextFactory>) -> Controllers {
    let logger = Arc::new(TracingLogger);

    // Infrastructure adapters
    let database_probe = Arc::new(DatabaseProbeMySql::new(db_context));

    // Health use cases
    let check_readiness_use_case = Arc::new(CheckReadinessUseCaseImpl {
        probe: database_probe,
        logger,
    });

    HealthApi::new(check_readiness_use_case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configuration::ConfigurationError;
    use crate::setup::container::Capability;
    use serde_json::json;

    fn with_connection_string(value: &str) -> Configuration {
        Configuration::from_document(json!({
            "ConnectionStrings": {"DefaultConnection": value}
        }))
    }

    #[test]
    fn should_register_every_capability_once() {
        // Arrange
        let config = with_connection_string("server=b");

        // Act
        let registry = register_services(&config).unwrap();

        // Assert
        assert_eq!(
            registry.capabilities(),
            vec![
                Capability::Controllers,
                Capability::EndpointMetadata,
                Capability::ApiSchemaGenerator,
                Capability::DbContext,
            ]
        );
    }

    #[test]
    fn should_fail_without_connection_string() {
        let result = register_services(&Configuration::default());

        assert!(matches!(
            result,
            Err(StartupError::Configuration(ConfigurationError::MissingKey(_)))
        ));
    }

    #[test]
    fn should_fail_with_blank_connection_string() {
        let result = register_services(&with_connection_string("  "));

        assert!(matches!(
            result,
            Err(StartupError::Configuration(ConfigurationError::EmptyValue(_)))
        ));
    }

    #[test]
    fn should_fail_with_unparsable_server_version() {
        let config = Configuration::from_document(json!({
            "ConnectionStrings": {"DefaultConnection": "server=b"},
            "Database": {"ServerVersion": "8.0.34-oracle"}
        }));

        let result = register_services(&config);

        assert!(matches!(result, Err(StartupError::VersionParse(_))));
    }

    #[tokio::test]
    async fn should_build_container_without_connecting() {
        let config = with_connection_string("Server=127.0.0.1;Port=1;Database=none");

        let container = register_services(&config).unwrap().build().unwrap();

        assert!(container.has(Capability::Controllers));
        assert!(container.has(Capability::DbContext));
    }
}
