use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{ApiResponse, OpenApi, payload::Json};

use business::domain::health::use_cases::check_readiness::CheckReadinessUseCase;

use crate::api::health::dto::{HealthCheckResponse, ReadinessResponseBody};
use crate::api::tags::ApiTags;

/// Health API for monitoring and infrastructure checks
///
/// Liveness does not touch any dependency; readiness opens a database
/// context for the duration of the check.
pub struct HealthApi {
    check_readiness_use_case: Arc<dyn CheckReadinessUseCase>,
}

impl HealthApi {
    pub fn new(check_readiness_use_case: Arc<dyn CheckReadinessUseCase>) -> Self {
        Self {
            check_readiness_use_case,
        }
    }
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Returns the current status of the service.
    /// This endpoint is public and does not require authentication.
    ///
    /// ## Response
    /// - `status`: "healthy" if service is running
    /// - `timestamp`: Current server timestamp in ISO 8601 format
    /// - `version`: Service version from Cargo.toml
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Readiness check endpoint
    ///
    /// Verifies the database answers a query. Returns 503 while it does not.
    #[oai(path = "/health/ready", method = "get", tag = "ApiTags::Health")]
    async fn readiness(&self) -> ReadinessResponse {
        let readiness = self.check_readiness_use_case.execute().await;
        if readiness.is_ready() {
            ReadinessResponse::Ready(Json(readiness.into()))
        } else {
            ReadinessResponse::Unavailable(Json(readiness.into()))
        }
    }
}

#[derive(ApiResponse)]
pub enum ReadinessResponse {
    #[oai(status = 200)]
    Ready(Json<ReadinessResponseBody>),
    #[oai(status = 503)]
    Unavailable(Json<ReadinessResponseBody>),
}
