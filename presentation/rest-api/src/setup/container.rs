use std::sync::Arc;

use persistence::db::{DatabaseConfig, DbContextFactory};
use poem_openapi::OpenApiService;

use crate::api::Controllers;
use crate::setup::dependency_injection::wire_controllers;
use crate::setup::pipeline::DISPATCH_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerBuildError {
    #[error("container.duplicate_registration: {0}")]
    DuplicateRegistration(&'static str),
    #[error("container.missing_dependency: {service} requires {requires}")]
    MissingDependency {
        service: &'static str,
        requires: &'static str,
    },
    #[error("container.missing_service: {0}")]
    MissingService(&'static str),
    #[error("container.pipeline_already_assembled")]
    PipelineAlreadyAssembled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Controllers,
    EndpointMetadata,
    ApiSchemaGenerator,
    DbContext,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Controllers => "controllers",
            Capability::EndpointMetadata => "endpoint_metadata",
            Capability::ApiSchemaGenerator => "api_schema_generator",
            Capability::DbContext => "db_context",
        }
    }
}

/// Title and version published in the generated API document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
}

impl ApiInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

enum Registration {
    Controllers,
    EndpointMetadata,
    ApiSchemaGenerator(ApiInfo),
    DbContext(DatabaseConfig),
}

impl Registration {
    fn capability(&self) -> Capability {
        match self {
            Registration::Controllers => Capability::Controllers,
            Registration::EndpointMetadata => Capability::EndpointMetadata,
            Registration::ApiSchemaGenerator(_) => Capability::ApiSchemaGenerator,
            Registration::DbContext(_) => Capability::DbContext,
        }
    }
}

/// Mutable set of service registrations, frozen by [`ServiceRegistry::build`].
#[derive(Default)]
pub struct ServiceRegistry {
    registrations: Vec<Registration>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller hosting and dispatch.
    pub fn add_controllers(&mut self) -> &mut Self {
        self.registrations.push(Registration::Controllers);
        self
    }

    /// Endpoint metadata the schema generator introspects.
    pub fn add_endpoints_api_explorer(&mut self) -> &mut Self {
        self.registrations.push(Registration::EndpointMetadata);
        self
    }

    pub fn add_api_schema_generator(&mut self, info: ApiInfo) -> &mut Self {
        self.registrations.push(Registration::ApiSchemaGenerator(info));
        self
    }

    pub fn add_db_context(&mut self, config: DatabaseConfig) -> &mut Self {
        self.registrations.push(Registration::DbContext(config));
        self
    }

    /// Registered capabilities in registration order.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.registrations
            .iter()
            .map(Registration::capability)
            .collect()
    }

    /// Freezes the registry into a container.
    ///
    /// Consumes the registry, so a registry can be built at most once. The
    /// database pool is created lazily and must be built inside a tokio
    /// runtime.
    pub fn build(self) -> Result<DependencyContainer, ContainerBuildError> {
        let mut controllers = false;
        let mut endpoint_metadata = false;
        let mut api_info = None;
        let mut database = None;

        for registration in self.registrations {
            let capability = registration.capability();
            let duplicate = match registration {
                Registration::Controllers => std::mem::replace(&mut controllers, true),
                Registration::EndpointMetadata => std::mem::replace(&mut endpoint_metadata, true),
                Registration::ApiSchemaGenerator(info) => api_info.replace(info).is_some(),
                Registration::DbContext(config) => database.replace(config).is_some(),
            };
            if duplicate {
                return Err(ContainerBuildError::DuplicateRegistration(
                    capability.as_str(),
                ));
            }
        }

        if api_info.is_some() && !endpoint_metadata {
            return Err(ContainerBuildError::MissingDependency {
                service: Capability::ApiSchemaGenerator.as_str(),
                requires: Capability::EndpointMetadata.as_str(),
            });
        }
        if controllers && database.is_none() {
            return Err(ContainerBuildError::MissingDependency {
                service: Capability::Controllers.as_str(),
                requires: Capability::DbContext.as_str(),
            });
        }

        let db_context = database
            .as_ref()
            .map(|config| Arc::new(DbContextFactory::new(config)));

        let api_service = match (&db_context, controllers) {
            (Some(db_context), true) => {
                let info = api_info.clone().unwrap_or_default();
                Some(
                    OpenApiService::new(
                        wire_controllers(db_context.clone()),
                        info.title,
                        info.version,
                    )
                    .server(DISPATCH_PREFIX),
                )
            }
            _ => None,
        };

        tracing::info!(
            controllers,
            endpoint_metadata,
            api_schema_generator = api_info.is_some(),
            db_context = db_context.is_some(),
            "Service container built"
        );

        Ok(DependencyContainer {
            api_service,
            endpoint_metadata,
            api_schema_generator: api_info.is_some(),
            db_context,
        })
    }
}

/// Immutable result of [`ServiceRegistry::build`].
pub struct DependencyContainer {
    api_service: Option<OpenApiService<Controllers, ()>>,
    endpoint_metadata: bool,
    api_schema_generator: bool,
    db_context: Option<Arc<DbContextFactory>>,
}

impl DependencyContainer {
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Controllers => self.api_service.is_some(),
            Capability::EndpointMetadata => self.endpoint_metadata,
            Capability::ApiSchemaGenerator => self.api_schema_generator,
            Capability::DbContext => self.db_context.is_some(),
        }
    }

    pub fn db_context(&self) -> Option<Arc<DbContextFactory>> {
        self.db_context.clone()
    }

    pub(crate) fn into_api_service(self) -> Option<OpenApiService<Controllers, ()>> {
        self.api_service
    }
}
