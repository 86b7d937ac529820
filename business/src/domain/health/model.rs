use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Up => "up",
            ComponentStatus::Down => "down",
        }
    }
}

/// Outcome of a readiness check against the service's backing dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct Readiness {
    pub database: ComponentStatus,
    /// Version string reported by the database server, when reachable.
    pub server_version: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl Readiness {
    pub fn up(server_version: String) -> Self {
        Self {
            database: ComponentStatus::Up,
            server_version: Some(server_version),
            checked_at: Utc::now(),
        }
    }

    pub fn down() -> Self {
        Self {
            database: ComponentStatus::Down,
            server_version: None,
            checked_at: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.database == ComponentStatus::Up
    }
}
