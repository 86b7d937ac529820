use poem::endpoint::BoxEndpoint;
use poem::{EndpointExt, Response, Route};
use poem_openapi::OpenApiService;

use crate::api::Controllers;
use crate::api::https_redirection::HttpsRedirection;
use crate::api::security::{Authorization, AuthorizationPolicy};
use crate::config::environment::Environment;
use crate::setup::application::Application;
use crate::setup::container::{Capability, ContainerBuildError};

/// Prefix under which every controller is dispatched.
pub const DISPATCH_PREFIX: &str = "/api";
/// Generated OpenAPI document (development only).
pub const API_SCHEMA_PATH: &str = "/openapi.json";
/// Interactive documentation UI (development only).
pub const DOCUMENTATION_UI_PATH: &str = "/docs";

/// One unit of request handling, in mount order.
pub enum Stage {
    ApiSchemaDocument,
    DocumentationUi,
    HttpsRedirection(HttpsRedirection),
    Authorization(AuthorizationPolicy),
    ControllerDispatch,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ApiSchemaDocument => "api_schema_document",
            Stage::DocumentationUi => "documentation_ui",
            Stage::HttpsRedirection(_) => "https_redirection",
            Stage::Authorization(_) => "authorization",
            Stage::ControllerDispatch => "controller_dispatch",
        }
    }
}

/// Ordered list of stages; turned into a `poem` endpoint only when serving.
///
/// A request meets the stages in mount order. Documentation stages answer
/// their own paths and hand everything else on; middleware stages wrap all
/// later stages; dispatch routes to the controllers. Paths nobody claims
/// end in 404.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    fn mount(&mut self, stage: Stage) {
        tracing::debug!(stage = stage.name(), "Mounting pipeline stage");
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn is_assembled(&self) -> bool {
        !self.stages.is_empty()
    }

    pub fn exposes_documentation(&self) -> bool {
        self.stages
            .iter()
            .any(|stage| matches!(stage, Stage::ApiSchemaDocument | Stage::DocumentationUi))
    }

    pub(crate) fn into_endpoint(
        self,
        api_service: Option<OpenApiService<Controllers, ()>>,
    ) -> Result<BoxEndpoint<'static, Response>, ContainerBuildError> {
        let (mut schema, mut ui) = match (&api_service, self.exposes_documentation()) {
            (Some(api_service), true) => (
                Some(api_service.spec_endpoint().map_to_response().boxed()),
                Some(api_service.swagger_ui().map_to_response().boxed()),
            ),
            _ => (None, None),
        };
        let mut api_service = api_service;

        let mut endpoint: BoxEndpoint<'static, Response> = Route::new().boxed();
        for stage in self.stages.into_iter().rev() {
            endpoint = match stage {
                Stage::ControllerDispatch => {
                    let controllers = api_service
                        .take()
                        .ok_or(ContainerBuildError::MissingService("controllers"))?;
                    Route::new()
                        .nest(DISPATCH_PREFIX, controllers)
                        .nest("/", endpoint)
                        .boxed()
                }
                Stage::Authorization(policy) => endpoint.with(Authorization::new(policy)).boxed(),
                Stage::HttpsRedirection(redirection) => endpoint.with(redirection).boxed(),
                Stage::DocumentationUi => {
                    let ui = ui
                        .take()
                        .ok_or(ContainerBuildError::MissingService("api_schema_generator"))?;
                    Route::new()
                        .nest(DOCUMENTATION_UI_PATH, ui)
                        .nest("/", endpoint)
                        .boxed()
                }
                Stage::ApiSchemaDocument => {
                    let schema = schema
                        .take()
                        .ok_or(ContainerBuildError::MissingService("api_schema_generator"))?;
                    Route::new()
                        .at(API_SCHEMA_PATH, schema)
                        .nest("/", endpoint)
                        .boxed()
                }
            };
        }

        Ok(endpoint)
    }
}

/// Mounts the request pipeline onto a built application.
///
/// Order: documentation (development only), HTTPS redirection,
/// authorization, controller dispatch. An application is assembled once.
pub fn assemble_pipeline(
    mut app: Application,
    environment: &Environment,
) -> Result<Application, ContainerBuildError> {
    if app.pipeline.is_assembled() {
        return Err(ContainerBuildError::PipelineAlreadyAssembled);
    }

    let mut pipeline = Pipeline::default();

    if environment.is_development() {
        if !app.container.has(Capability::ApiSchemaGenerator) {
            return Err(ContainerBuildError::MissingService(
                Capability::ApiSchemaGenerator.as_str(),
            ));
        }
        pipeline.mount(Stage::ApiSchemaDocument);
        pipeline.mount(Stage::DocumentationUi);
    }

    let redirection = app.config.https.redirection();
    if !redirection.is_active() {
        tracing::warn!("No HTTPS port configured; plain requests will not be redirected");
    }
    pipeline.mount(Stage::HttpsRedirection(redirection));

    let policy = app.config.authorization.policy(DISPATCH_PREFIX);
    if !policy.is_enforcing() {
        tracing::warn!("No token secret configured; requests are authorized anonymously");
    }
    pipeline.mount(Stage::Authorization(policy));

    if !app.container.has(Capability::Controllers) {
        return Err(ContainerBuildError::MissingService(
            Capability::Controllers.as_str(),
        ));
    }
    pipeline.mount(Stage::ControllerDispatch);

    tracing::info!(
        environment = %environment,
        stages = ?pipeline.stage_names(),
        "Request pipeline assembled"
    );
    app.pipeline = pipeline;
    Ok(app)
}
