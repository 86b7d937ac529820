use poem::Response;
use poem::endpoint::BoxEndpoint;

use crate::config::app_config::AppConfig;
use crate::setup::container::{ContainerBuildError, DependencyContainer};
use crate::setup::pipeline::Pipeline;

/// A built service: frozen container, host settings and request pipeline.
///
/// Serving consumes it, which is the only way to reach the running state.
pub struct Application {
    pub(crate) container: DependencyContainer,
    pub(crate) config: AppConfig,
    pub(crate) pipeline: Pipeline,
}

impl Application {
    pub fn new(container: DependencyContainer, config: AppConfig) -> Self {
        Self {
            container,
            config,
            pipeline: Pipeline::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Converts the assembled pipeline into the endpoint handed to the listener.
    pub fn into_endpoint(self) -> Result<BoxEndpoint<'static, Response>, ContainerBuildError> {
        if !self.pipeline.is_assembled() {
            return Err(ContainerBuildError::MissingService("pipeline"));
        }
        self.pipeline
            .into_endpoint(self.container.into_api_service())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::container::{Capability, ServiceRegistry};

    #[test]
    fn should_refuse_to_serve_unassembled_application() {
        let app = Application::new(ServiceRegistry::new().build().unwrap(), AppConfig::default());

        assert!(!app.pipeline().is_assembled());
        assert!(!app.container.has(Capability::Controllers));
        assert!(matches!(
            app.into_endpoint(),
            Err(ContainerBuildError::MissingService("pipeline"))
        ));
    }
}
