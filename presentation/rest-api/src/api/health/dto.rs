use business::domain::health::model::Readiness;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct ReadinessResponseBody {
    /// "ready" or "unavailable"
    pub status: String,
    /// Database status: "up" or "down"
    pub database: String,
    /// Version reported by the database server
    pub server_version: Option<String>,
    /// Time of the check in ISO 8601 format
    pub checked_at: String,
}

impl From<Readiness> for ReadinessResponseBody {
    fn from(readiness: Readiness) -> Self {
        Self {
            status: if readiness.is_ready() {
                "ready"
            } else {
                "unavailable"
            }
            .to_string(),
            database: readiness.database.as_str().to_string(),
            server_version: readiness.server_version,
            checked_at: readiness.checked_at.to_rfc3339(),
        }
    }
}
