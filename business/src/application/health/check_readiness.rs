use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::health::model::Readiness;
use crate::domain::health::probe::DatabaseProbe;
use crate::domain::health::use_cases::check_readiness::CheckReadinessUseCase;
use crate::domain::logger::Logger;

pub struct CheckReadinessUseCaseImpl {
    pub probe: Arc<dyn DatabaseProbe>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl CheckReadinessUseCase for CheckReadinessUseCaseImpl {
    async fn execute(&self) -> Readiness {
        self.logger.debug("Checking database readiness");

        match self.probe.server_version().await {
            Ok(version) => Readiness::up(version),
            Err(err) => {
                self.logger
                    .warn(&format!("Database readiness check failed: {err}"));
                Readiness::down()
            }
        }
    }
}
