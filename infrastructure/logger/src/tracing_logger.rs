use business::domain::logger::{LogLevel, Logger};
use tracing::{debug, error, info, warn};

const TARGET: &str = "service-shell";

/// Adapter routing domain log lines into the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: TARGET, "{}", message),
            LogLevel::Info => info!(target: TARGET, "{}", message),
            LogLevel::Warn => warn!(target: TARGET, "{}", message),
            LogLevel::Error => error!(target: TARGET, "{}", message),
        }
    }
}
