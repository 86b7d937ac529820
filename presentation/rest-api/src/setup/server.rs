use std::time::Duration;

use poem::{EndpointExt, Server as PoemServer, listener::TcpListener, middleware::Tracing};

use crate::setup::application::Application;
use crate::setup::pipeline::{API_SCHEMA_PATH, DOCUMENTATION_UI_PATH};

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

pub struct Server;

impl Server {
    /// Binds the listener and serves until Ctrl-C.
    pub async fn run(app: Application) -> anyhow::Result<()> {
        let addr = app.config().server.bind_address();
        let environment = app.config().environment.clone();
        let exposes_documentation = app.pipeline().exposes_documentation();
        let endpoint = app.into_endpoint()?.with(Tracing);

        tracing::info!(
            environment = %environment,
            "Server running at http://{}",
            addr
        );
        if exposes_documentation {
            tracing::info!("Swagger UI at http://{}{}", addr, DOCUMENTATION_UI_PATH);
            tracing::info!("OpenAPI JSON at http://{}{}", addr, API_SCHEMA_PATH);
        }

        PoemServer::new(TcpListener::bind(&addr))
            .run_with_graceful_shutdown(endpoint, shutdown_signal(), Some(SHUTDOWN_GRACE_PERIOD))
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
