use crate::config::ServiceConfigError;
use crate::registry::RegistryError;
use missive_ack::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    Config(ServiceConfigError),
    Telemetry(TelemetryError),
    Registry(RegistryError),
    Io(std::io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(err) => write!(f, "configuration error: {}", err),
            ServiceError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            ServiceError::Registry(err) => write!(f, "registry error: {}", err),
            ServiceError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Config(err) => Some(err),
            ServiceError::Telemetry(err) => Some(err),
            ServiceError::Registry(err) => Some(err),
            ServiceError::Io(err) => Some(err),
        }
    }
}

impl From<ServiceConfigError> for ServiceError {
    fn from(value: ServiceConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for ServiceError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<RegistryError> for ServiceError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
