use async_trait::async_trait;

use crate::domain::health::model::Readiness;

#[async_trait]
pub trait CheckReadinessUseCase: Send + Sync {
    async fn execute(&self) -> Readiness;
}
