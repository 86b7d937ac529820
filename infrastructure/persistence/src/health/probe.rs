use std::sync::Arc;

use async_trait::async_trait;

use business::domain::health::errors::ProbeError;
use business::domain::health::probe::DatabaseProbe;

use crate::db::DbContextFactory;

pub struct DatabaseProbeMySql {
    contexts: Arc<DbContextFactory>,
}

impl DatabaseProbeMySql {
    pub fn new(contexts: Arc<DbContextFactory>) -> Self {
        Self { contexts }
    }
}

#[async_trait]
impl DatabaseProbe for DatabaseProbeMySql {
    async fn server_version(&self) -> Result<String, ProbeError> {
        let mut context = self
            .contexts
            .create_context()
            .await
            .map_err(|_| ProbeError::Unreachable)?;

        sqlx::query_scalar::<_, String>("SELECT VERSION()")
            .fetch_one(context.connection())
            .await
            .map_err(|e| {
                tracing::warn!("Database version query failed: {e}");
                ProbeError::QueryFailed
            })
    }
}
