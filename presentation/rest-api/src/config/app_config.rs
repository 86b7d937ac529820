use super::authorization_config::AuthorizationConfig;
use super::configuration::{Configuration, ConfigurationError};
use super::environment::Environment;
use super::https_config::HttpsConfig;
use super::server_config::ServerConfig;

/// Host-level settings consumed by the pipeline and the listener.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub https: HttpsConfig,
    pub authorization: AuthorizationConfig,
}

impl AppConfig {
    pub fn from_configuration(
        config: &Configuration,
        environment: Environment,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            environment,
            server: ServerConfig::from_section(&config.server),
            https: HttpsConfig::from_section(&config.https_redirection),
            authorization: AuthorizationConfig::from_section(&config.authorization)?,
        })
    }
}
