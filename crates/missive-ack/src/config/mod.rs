use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File consulted when no configuration path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "conf/missive-ack.env";

const AUTHORITY_URL: &str = "MISSIVE_AUTHORITY_URL";
const AUTHORITY_TIMEOUT: &str = "MISSIVE_AUTHORITY_TIMEOUT_SECS";
const AUTHORITY_CONNECT_TIMEOUT: &str = "MISSIVE_AUTHORITY_CONNECT_TIMEOUT_SECS";
const TEMPLATE_DIR: &str = "MISSIVE_TEMPLATE_DIR";
const TEMPLATE_NAME: &str = "MISSIVE_TEMPLATE_NAME";
const LOG_LEVEL: &str = "MISSIVE_LOG_LEVEL";
const LOG_FILE: &str = "MISSIVE_LOG_FILE";

/// Immutable settings for one acknowledgement run, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub authority: AuthorityConfig,
    pub template: TemplateConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads `path` (or [`DEFAULT_CONFIG_PATH`] when it exists) as a dotenv
    /// file. Process environment variables take precedence over file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                read_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => HashMap::new(),
        };

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let authority = AuthorityConfig {
            url: value(AUTHORITY_URL),
            request_timeout: seconds(AUTHORITY_TIMEOUT, value(AUTHORITY_TIMEOUT), 30)?,
            connect_timeout: seconds(
                AUTHORITY_CONNECT_TIMEOUT,
                value(AUTHORITY_CONNECT_TIMEOUT),
                10,
            )?,
        };

        let template = TemplateConfig {
            directory: value(TEMPLATE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("templates")),
            name: value(TEMPLATE_NAME),
        };

        let defaults = TelemetryConfig::default();
        let telemetry = TelemetryConfig {
            log_level: value(LOG_LEVEL).unwrap_or(defaults.log_level),
            log_file: value(LOG_FILE).map(PathBuf::from).or(defaults.log_file),
        };

        Ok(Self {
            authority,
            template,
            telemetry,
        })
    }
}

fn read_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let unreadable = |source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    dotenvy::from_path_iter(path)
        .map_err(unreadable)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(unreadable)
}

fn seconds(key: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidNumber { key, value: raw }),
    }
}

/// Connection settings for the validation authority. A missing URL is only an
/// error once a check is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityConfig {
    pub url: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub directory: PathBuf,
    pub name: Option<String>,
}

impl TemplateConfig {
    pub fn require_name(&self) -> Result<&str, ConfigError> {
        self.name.as_deref().ok_or(ConfigError::MissingTemplateName)
    }
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

/// `info` to stderr; also what a binary logs with before its configuration
/// is readable.
impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable {
        path: PathBuf,
        source: dotenvy::Error,
    },
    InvalidNumber {
        key: &'static str,
        value: String,
    },
    MissingTemplateName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, .. } => {
                write!(f, "unable to read configuration file {}", path.display())
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive number of seconds, got '{value}'")
            }
            ConfigError::MissingTemplateName => {
                write!(f, "{TEMPLATE_NAME} must name the acknowledgement template")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::InvalidNumber { .. } | ConfigError::MissingTemplateName => None,
        }
    }
}
