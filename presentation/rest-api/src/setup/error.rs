use persistence::server_version::ServerVersionError;

use crate::config::configuration::ConfigurationError;
use crate::setup::container::ContainerBuildError;

/// Anything that stops the service before it starts listening.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("startup.version_parse: {0}")]
    VersionParse(#[from] ServerVersionError),
    #[error(transparent)]
    ContainerBuild(#[from] ContainerBuildError),
}
