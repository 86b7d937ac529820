use std::path::Path;

use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::{
    app_config::AppConfig,
    environment::Environment,
    loader::{BASE_PATH_VARIABLE, ConfigurationLoader, DEFAULT_BASE_PATH},
};
use setup::{
    application::Application, dependency_injection::register_services, error::StartupError,
    pipeline::assemble_pipeline, server::Server,
};

/// REST API Entry Point
///
/// Loads configuration, composes services, assembles the request pipeline
/// and starts the HTTP server, in that order and exactly once.
///
/// - config/: Configuration sources and typed settings
/// - setup/: Service registration, pipeline assembly and server
/// - api/: Middleware, controllers and DTOs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 2. Load environment variables
    dotenv().ok();

    // 3-6. Load configuration, compose, build and assemble
    let base_path =
        std::env::var(BASE_PATH_VARIABLE).unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string());
    let app = match startup(Path::new(&base_path), Environment::from_env()) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!("Startup failed: {err}");
            return Err(err.into());
        }
    };

    // 7. Run server
    Server::run(app).await
}

/// Runs every startup step up to, but not including, binding the listener.
fn startup(base_path: &Path, environment: Environment) -> Result<Application, StartupError> {
    let configuration = ConfigurationLoader::new(base_path, environment.clone()).load()?;
    let app_config = AppConfig::from_configuration(&configuration, environment.clone())?;

    let container = register_services(&configuration)?.build()?;

    let app = Application::new(container, app_config);
    Ok(assemble_pipeline(app, &environment)?)
}
