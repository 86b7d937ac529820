use std::fmt;

use super::configuration::{AuthorizationSection, ConfigurationError};
use crate::api::security::{AuthorizationPolicy, TokenValidator};

pub const JWT_SECRET_KEY: &str = "Authorization:Jwt:Secret";

/// Paths reachable without a token when none are configured.
pub const DEFAULT_ANONYMOUS_PATHS: &[&str] = &["/api/health"];

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationConfig {
    pub jwt: Option<JwtConfig>,
    pub anonymous_paths: Vec<String>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            jwt: None,
            anonymous_paths: DEFAULT_ANONYMOUS_PATHS
                .iter()
                .map(|path| path.to_string())
                .collect(),
        }
    }
}

impl AuthorizationConfig {
    /// Load authorization settings
    ///
    /// Keys:
    /// - Authorization:Jwt:Secret: HS256 signing secret; enables token checks
    /// - Authorization:Jwt:Issuer / Audience: optional claim checks
    /// - Authorization:AnonymousPaths: paths that skip token checks
    pub fn from_section(section: &AuthorizationSection) -> Result<Self, ConfigurationError> {
        let jwt = section
            .jwt
            .as_ref()
            .and_then(|jwt| jwt.secret.as_deref().map(|secret| (jwt, secret)));
        let jwt = match jwt {
            None => None,
            Some((_, secret)) if secret.trim().is_empty() => {
                return Err(ConfigurationError::EmptyValue(JWT_SECRET_KEY.to_string()));
            }
            Some((jwt, secret)) => Some(JwtConfig {
                secret: secret.to_string(),
                issuer: non_blank(jwt.issuer.as_deref()),
                audience: non_blank(jwt.audience.as_deref()),
            }),
        };

        let configured: Vec<String> = section
            .anonymous_paths
            .iter()
            .map(|path| path.trim().trim_end_matches('/').to_string())
            .filter(|path| !path.is_empty())
            .collect();

        let mut authorization = Self {
            jwt,
            ..Self::default()
        };
        if !configured.is_empty() {
            authorization.anonymous_paths = configured;
        }
        Ok(authorization)
    }

    /// Policy guarding every path below `protected_prefix`.
    pub fn policy(&self, protected_prefix: &str) -> AuthorizationPolicy {
        let policy = AuthorizationPolicy::new(protected_prefix, self.anonymous_paths.clone());
        match &self.jwt {
            Some(jwt) => policy.with_validator(TokenValidator::hs256(
                &jwt.secret,
                jwt.issuer.as_deref(),
                jwt.audience.as_deref(),
            )),
            None => policy,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configuration::Configuration;
    use serde_json::json;

    fn load(document: serde_json::Value) -> Result<AuthorizationConfig, ConfigurationError> {
        AuthorizationConfig::from_section(&Configuration::from_document(document).authorization)
    }

    #[test]
    fn should_allow_anonymous_access_without_secret() {
        let config = load(json!({})).unwrap();

        assert!(config.jwt.is_none());
        assert_eq!(config.anonymous_paths, vec!["/api/health".to_string()]);
        assert!(!config.policy("/api").is_enforcing());
    }

    #[test]
    fn should_enforce_tokens_when_secret_is_configured() {
        // Arrange
        let document = json!({
            "Authorization": {
                "Jwt": {"Secret": "top-secret", "Issuer": "studymate"},
                "AnonymousPaths": ["/api/public/"]
            }
        });

        // Act
        let config = load(document).unwrap();

        // Assert
        let jwt = config.jwt.as_ref().unwrap();
        assert_eq!(jwt.issuer.as_deref(), Some("studymate"));
        assert_eq!(jwt.audience, None);
        assert_eq!(config.anonymous_paths, vec!["/api/public".to_string()]);
        assert!(config.policy("/api").is_enforcing());
    }

    #[test]
    fn should_reject_blank_secret() {
        let result = load(json!({"Authorization": {"Jwt": {"Secret": " "}}}));

        assert!(matches!(result, Err(ConfigurationError::EmptyValue(_))));
    }

    #[test]
    fn should_not_leak_secret_in_debug_output() {
        let config = load(json!({"Authorization": {"Jwt": {"Secret": "top-secret"}}})).unwrap();

        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
