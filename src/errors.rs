use std::fmt::Debug;

use thiserror::Error;

use crate::model::Model;

/// A model identifier outside the supported variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sensor model '{0}'")]
pub struct UnknownModel(pub String);

/// Driver errors, generic over the bus error type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error<E> {
    #[error("bus transaction failed: {0:?}")]
    Transport(E),

    #[error("unexpected sensor identity: got {got:#04x}, wanted {want:#04x}")]
    UnexpectedIdentity { got: u8, want: u8 },

    #[error("'{operation}' is not supported by the {model}")]
    UnsupportedOperation { operation: &'static str, model: Model },

    #[error(transparent)]
    UnknownModel(#[from] UnknownModel),

    #[error("proximity channel {0} does not exist")]
    InvalidChannel(u8),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Bring-up errors raised while turning a configuration into a running sensor
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open I2C bus '{path}': {reason}")]
    BusOpen { path: String, reason: String },

    #[error("Sensor setup failed: {0}")]
    Sensor(String),
}

impl<E: Debug> From<Error<E>> for SetupError {
    fn from(error: Error<E>) -> Self {
        SetupError::Sensor(error.to_string())
    }
}

/// Result type aliases for convenience
pub type DriverResult<T, E> = Result<T, Error<E>>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SetupResult<T> = Result<T, SetupError>;
