pub mod app_config;
pub mod authorization_config;
pub mod configuration;
pub mod database_config;
pub mod environment;
pub mod https_config;
pub mod loader;
pub mod server_config;
