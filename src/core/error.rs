//! Configuration error types shared by the channel and the application shell

use crate::core::error_handling::ContextualError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Channel capacity must be at least 1 (got {capacity})")]
    InvalidCapacity { capacity: i64 },

    #[error("Worker count '{field}' cannot be negative (got {value})")]
    NegativeWorkerCount { field: String, value: i64 },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Could not read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for configuration handling
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::InvalidCapacity { .. }
            | ConfigError::NegativeWorkerCount { .. }
            | ConfigError::InvalidValue { .. }
            | ConfigError::Parse { .. } => true,
            ConfigError::Io { .. } => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        self.is_user_actionable().then(|| self.to_string())
    }
}

/// Failures while bringing a simulation up
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not spawn worker thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SimulationResult<T> = Result<T, SimulationError>;

impl ContextualError for SimulationError {
    fn is_user_actionable(&self) -> bool {
        match self {
            SimulationError::Config(e) => e.is_user_actionable(),
            SimulationError::Spawn { .. } => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            SimulationError::Config(e) => e.user_message(),
            SimulationError::Spawn { .. } => None,
        }
    }
}
