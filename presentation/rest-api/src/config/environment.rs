use std::fmt;

/// Process variable naming the hosting environment.
pub const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";

/// Hosting environment the service runs in.
///
/// Selects the overlay settings document and whether the documentation
/// endpoints are mounted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
    Custom(String),
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "" | "production" => Environment::Production,
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            _ => Environment::Custom(name.to_string()),
        }
    }

    /// Reads `APP_ENVIRONMENT`, defaulting to production.
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_VARIABLE)
            .map(|name| Self::from_name(&name))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        match self {
            Environment::Development => "Development",
            Environment::Staging => "Staging",
            Environment::Production => "Production",
            Environment::Custom(name) => name,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_names_case_insensitively() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name(" STAGING "), Environment::Staging);
        assert_eq!(Environment::from_name("Production"), Environment::Production);
    }

    #[test]
    fn should_default_blank_name_to_production() {
        assert_eq!(Environment::from_name(""), Environment::Production);
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn should_keep_custom_name_verbatim() {
        let environment = Environment::from_name("QA");

        assert_eq!(environment, Environment::Custom("QA".to_string()));
        assert_eq!(environment.name(), "QA");
        assert!(!environment.is_development());
    }

    #[test]
    fn should_only_flag_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }
}
