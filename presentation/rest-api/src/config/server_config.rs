use super::configuration::ServerSection;

/// Server configuration for HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Load server configuration
    ///
    /// Keys:
    /// - Server:Ip: IP address to bind (default: "127.0.0.1")
    /// - Server:Port: Port to bind (default: 8080)
    pub fn from_section(section: &ServerSection) -> Self {
        let defaults = Self::default();
        let ip = section
            .ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.ip);

        Self {
            ip,
            port: section.port.unwrap_or(defaults.port),
        }
    }

    /// Get the bind address as "ip:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configuration::{Configuration, ConfigurationError};
    use crate::config::loader::{CaseFolded, extract};
    use figment::Figment;
    use figment::providers::Serialized;
    use serde_json::json;

    #[test]
    fn should_create_bind_address_from_ip_and_port() {
        // Arrange
        let config = ServerConfig {
            ip: "127.0.0.1".to_string(),
            port: 8080,
        };

        // Act
        let address = config.bind_address();

        // Assert
        assert_eq!(address, "127.0.0.1:8080");
    }

    #[test]
    fn should_fall_back_to_defaults() {
        let config = ServerConfig::from_section(&ServerSection::default());

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn should_read_overrides() {
        let configuration = Configuration::from_document(json!({
            "Server": {"Ip": "0.0.0.0", "Port": 5000}
        }));

        let config = ServerConfig::from_section(&configuration.server);

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn should_reject_port_out_of_range() {
        let figment = Figment::from(CaseFolded(Serialized::defaults(json!({
            "Server": {"Port": 70000}
        }))));

        let result = extract(&figment);

        assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
    }
}
