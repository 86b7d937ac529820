pub mod application;
pub mod container;
pub mod dependency_injection;
pub mod error;
pub mod pipeline;
pub mod server;
