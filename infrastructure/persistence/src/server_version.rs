use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Descriptor used when the configuration does not name one.
pub const DEFAULT_SERVER_VERSION: &str = "8.0.34-mysql";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerVersionError {
    #[error("server_version.empty")]
    Empty,
    #[error("server_version.malformed: {0}")]
    Malformed(String),
    #[error("server_version.unknown_engine: {0}")]
    UnknownEngine(String),
    #[error("server_version.unsupported: {0}")]
    Unsupported(String),
}

/// Database engine family targeted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEngine {
    MySql,
    MariaDb,
}

impl ServerEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerEngine::MySql => "mysql",
            ServerEngine::MariaDb => "mariadb",
        }
    }

    /// Oldest (major, minor) release accepted for this engine.
    fn minimum(&self) -> (u32, u32) {
        match self {
            ServerEngine::MySql => (5, 7),
            ServerEngine::MariaDb => (10, 2),
        }
    }
}

impl FromStr for ServerEngine {
    type Err = ServerVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(ServerEngine::MySql),
            "mariadb" => Ok(ServerEngine::MariaDb),
            _ => Err(ServerVersionError::UnknownEngine(s.to_string())),
        }
    }
}

/// Engine family plus semantic version, e.g. `8.0.34-mysql`.
///
/// Parsing accepts `major.minor[.patch][-engine]`. Without an engine suffix
/// MySQL is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerVersion {
    pub engine: ServerEngine,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ServerVersion {
    pub fn parse(s: &str) -> Result<Self, ServerVersionError> {
        s.parse()
    }
}

impl Default for ServerVersion {
    fn default() -> Self {
        Self {
            engine: ServerEngine::MySql,
            major: 8,
            minor: 0,
            patch: 34,
        }
    }
}

impl FromStr for ServerVersion {
    type Err = ServerVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ServerVersionError::Empty);
        }

        let (numbers, engine) = match s.split_once('-') {
            Some((numbers, engine)) => (numbers, engine.parse::<ServerEngine>()?),
            None => (s, ServerEngine::MySql),
        };

        let parts = numbers
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ServerVersionError::Malformed(s.to_string()))?;

        let (major, minor, patch) = match parts.as_slice() {
            [major, minor] => (*major, *minor, 0),
            [major, minor, patch] => (*major, *minor, *patch),
            _ => return Err(ServerVersionError::Malformed(s.to_string())),
        };

        if (major, minor) < engine.minimum() {
            return Err(ServerVersionError::Unsupported(s.to_string()));
        }

        Ok(Self {
            engine,
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            self.major,
            self.minor,
            self.patch,
            self.engine.as_str()
        )
    }
}
