use std::path::PathBuf;

use figment::providers::{Env, Format, Json};
use figment::value::{Dict, Map, Uncased, UncasedStr, Value};
use figment::{Figment, Metadata, Profile, Provider};

use super::configuration::{Configuration, ConfigurationError};
use super::environment::Environment;

/// Required settings document, relative to the base directory.
pub const PRIMARY_DOCUMENT: &str = "appsettings.json";
/// Base directory used when `APP_CONFIG_DIR` is not set.
pub const DEFAULT_BASE_PATH: &str = "appsettings";
pub const BASE_PATH_VARIABLE: &str = "APP_CONFIG_DIR";

/// Variables with this prefix land under `ConnectionStrings`.
const MYSQL_CONNECTION_STRING_PREFIX: &str = "MYSQLCONNSTR_";
const ENVIRONMENT_KEY_DELIMITER: &str = "__";

/// Builds the configuration from, lowest to highest precedence:
/// `appsettings.json`, `appsettings.<Environment>.json` and the process
/// environment.
///
/// Environment variables take part when their name contains `__` (the
/// section separator, `Server__Port`) or starts with `MYSQLCONNSTR_`.
pub struct ConfigurationLoader {
    base_path: PathBuf,
    environment: Environment,
}

impl ConfigurationLoader {
    pub fn new(base_path: impl Into<PathBuf>, environment: Environment) -> Self {
        Self {
            base_path: base_path.into(),
            environment,
        }
    }

    pub fn primary_document(&self) -> PathBuf {
        self.base_path.join(PRIMARY_DOCUMENT)
    }

    pub fn overlay_document(&self) -> PathBuf {
        self.base_path
            .join(format!("appsettings.{}.json", self.environment.name()))
    }

    /// Layers every source, failing fast when the primary document is missing.
    pub fn figment(&self) -> Result<Figment, ConfigurationError> {
        let primary = self.primary_document();
        if !primary.is_file() {
            return Err(ConfigurationError::RequiredDocumentMissing(primary));
        }
        let mut figment = Figment::new().merge(CaseFolded(Json::file(&primary)));

        let overlay = self.overlay_document();
        if overlay.is_file() {
            figment = figment.merge(CaseFolded(Json::file(&overlay)));
        } else {
            tracing::debug!(path = %overlay.display(), "Optional settings document not found");
        }

        Ok(figment.merge(CaseFolded(environment_variables())))
    }

    pub fn load(&self) -> Result<Configuration, ConfigurationError> {
        let figment = self.figment()?;
        let configuration = extract(&figment)?;

        tracing::info!(
            environment = %self.environment,
            sources = figment.metadata().count(),
            "Configuration loaded"
        );
        Ok(configuration)
    }
}

pub(crate) fn extract(figment: &Figment) -> Result<Configuration, ConfigurationError> {
    Ok(figment.extract()?)
}

fn environment_variables() -> Env {
    Env::raw()
        .filter_map(variable_key)
        .split(ENVIRONMENT_KEY_DELIMITER)
}

fn variable_key(name: &UncasedStr) -> Option<Uncased<'_>> {
    let raw = name.as_str();
    let prefix_len = MYSQL_CONNECTION_STRING_PREFIX.len();
    match raw.get(..prefix_len) {
        Some(prefix) if prefix.eq_ignore_ascii_case(MYSQL_CONNECTION_STRING_PREFIX) => {
            let connection = &raw[prefix_len..];
            Some(Uncased::from(format!(
                "ConnectionStrings{ENVIRONMENT_KEY_DELIMITER}{connection}"
            )))
        }
        _ if raw.contains(ENVIRONMENT_KEY_DELIMITER) => Some(Uncased::from(raw)),
        _ => None,
    }
}

/// Lowercases every key of the wrapped provider so lookups ignore case.
pub(crate) struct CaseFolded<P>(pub(crate) P);

impl<P: Provider> Provider for CaseFolded<P> {
    fn metadata(&self) -> Metadata {
        self.0.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(self
            .0
            .data()?
            .into_iter()
            .map(|(profile, dict)| (profile, fold_keys(dict)))
            .collect())
    }
}

fn fold_keys(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), fold_value(value)))
        .collect()
}

fn fold_value(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => Value::Dict(tag, fold_keys(dict)),
        Value::Array(tag, items) => Value::Array(tag, items.into_iter().map(fold_value).collect()),
        scalar => scalar,
    }
}
