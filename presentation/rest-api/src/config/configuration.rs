use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("configuration.required_document_missing: {}", .0.display())]
    RequiredDocumentMissing(PathBuf),
    #[error("configuration.invalid: {0}")]
    Invalid(Box<figment::Error>),
    #[error("configuration.missing_key: {0}")]
    MissingKey(String),
    #[error("configuration.empty_value: {0}")]
    EmptyValue(String),
    #[error("configuration.invalid_value: {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<figment::Error> for ConfigurationError {
    fn from(err: figment::Error) -> Self {
        ConfigurationError::Invalid(Box::new(err))
    }
}

/// Merged settings from every configuration source.
///
/// Names compare case-insensitively: the loader folds every key to
/// lowercase before extraction, which is why the renames below are lowercase.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(rename = "connectionstrings")]
    pub connection_strings: BTreeMap<String, String>,
    pub database: DatabaseSection,
    pub server: ServerSection,
    #[serde(rename = "httpsredirection")]
    pub https_redirection: HttpsRedirectionSection,
    pub authorization: AuthorizationSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(rename = "serverversion")]
    pub server_version: Option<String>,
    #[serde(rename = "maxconnections")]
    pub max_connections: Option<u32>,
    #[serde(rename = "acquiretimeoutseconds")]
    pub acquire_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub ip: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpsRedirectionSection {
    #[serde(rename = "httpsport")]
    pub https_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorizationSection {
    pub jwt: Option<JwtSection>,
    #[serde(rename = "anonymouspaths")]
    pub anonymous_paths: Vec<String>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct JwtSection {
    pub secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl fmt::Debug for JwtSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSection")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the named connection string, failing when it is absent or blank.
    pub fn require_connection_string(&self, name: &str) -> Result<&str, ConfigurationError> {
        let key = format!("ConnectionStrings:{name}");
        match self.connection_string(name) {
            None => Err(ConfigurationError::MissingKey(key)),
            Some(value) if value.trim().is_empty() => Err(ConfigurationError::EmptyValue(key)),
            Some(value) => Ok(value),
        }
    }
}

#[cfg(test)]
impl Configuration {
    /// Extracts a configuration from one inline settings document.
    pub(crate) fn from_document(document: serde_json::Value) -> Self {
        use figment::Figment;
        use figment::providers::Serialized;

        use crate::config::loader::{CaseFolded, extract};

        extract(&Figment::from(CaseFolded(Serialized::defaults(document)))).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_look_up_names_case_insensitively() {
        let config = Configuration::from_document(json!({
            "CONNECTIONSTRINGS": {"DefaultConnection": "server=a"},
            "server": {"PORT": 9090}
        }));

        assert_eq!(config.connection_string("defaultconnection"), Some("server=a"));
        assert_eq!(config.connection_string("DEFAULTCONNECTION"), Some("server=a"));
        assert_eq!(config.server.port, Some(9090));
    }

    #[test]
    fn should_report_missing_and_blank_connection_strings() {
        let config = Configuration::from_document(json!({
            "ConnectionStrings": {"Blank": "   "}
        }));

        assert!(matches!(
            config.require_connection_string("Absent"),
            Err(ConfigurationError::MissingKey(key)) if key == "ConnectionStrings:Absent"
        ));
        assert!(matches!(
            config.require_connection_string("Blank"),
            Err(ConfigurationError::EmptyValue(key)) if key == "ConnectionStrings:Blank"
        ));
    }

    #[test]
    fn should_default_every_section() {
        let config = Configuration::from_document(json!({}));

        assert!(config.connection_strings.is_empty());
        assert_eq!(config.server.port, None);
        assert!(config.authorization.jwt.is_none());
        assert!(config.authorization.anonymous_paths.is_empty());
    }

    #[test]
    fn should_not_leak_jwt_secret_in_debug_output() {
        let config = Configuration::from_document(json!({
            "Authorization": {"Jwt": {"Secret": "top-secret"}}
        }));

        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
