pub mod error;
pub mod health;
pub mod https_redirection;
pub mod security;
pub mod tags;

/// Every controller dispatched under the API prefix.
pub type Controllers = health::routes::HealthApi;
