use async_trait::async_trait;

use crate::domain::health::errors::ProbeError;

/// Port used to check that the relational database answers queries.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Returns the version string reported by the server.
    async fn server_version(&self) -> Result<String, ProbeError>;
}
