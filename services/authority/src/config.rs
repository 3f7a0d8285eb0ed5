use missive_ack::config::TelemetryConfig;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Settings for the stand-in validation authority.
#[derive(Debug, Clone)]
pub struct AuthorityServiceConfig {
    pub server: ServerConfig,
    pub registry: PathBuf,
    pub telemetry: TelemetryConfig,
}

impl AuthorityServiceConfig {
    pub fn load() -> Result<Self, ServiceConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("AUTHORITY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("AUTHORITY_PORT")
            .unwrap_or_else(|_| "8089".to_string())
            .parse::<u16>()
            .map_err(|_| ServiceConfigError::InvalidPort)?;
        let registry = env::var("AUTHORITY_REGISTRY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("conf/registry.csv"));
        let log_level = env::var("AUTHORITY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            registry,
            telemetry: TelemetryConfig {
                log_level,
                log_file: None,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ServiceConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ServiceConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug)]
pub enum ServiceConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ServiceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceConfigError::InvalidPort => write!(f, "AUTHORITY_PORT must be a valid u16"),
            ServiceConfigError::InvalidHost { .. } => {
                write!(f, "AUTHORITY_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ServiceConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceConfigError::InvalidPort => None,
            ServiceConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("AUTHORITY_HOST");
        env::remove_var("AUTHORITY_PORT");
        env::remove_var("AUTHORITY_REGISTRY");
        env::remove_var("AUTHORITY_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AuthorityServiceConfig::load().expect("config loads with defaults");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8089);
        assert_eq!(config.registry, PathBuf::from("conf/registry.csv"));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AUTHORITY_PORT", "eighty");
        let result = AuthorityServiceConfig::load();
        reset_env();
        assert!(matches!(result, Err(ServiceConfigError::InvalidPort)));
    }

    #[test]
    fn accepts_localhost_host() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8089,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8089));
    }
}
