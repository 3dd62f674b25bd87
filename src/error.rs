//! Error types for the bridge.
//!
//! Only module startup can fail. Per-entity problems are skipped and retried
//! on the next frame, and a simulation step has no error path.

use thiserror::Error;

/// Top-level error type returned while loading the physics module.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics backend failed to initialize: {0}")]
    BackendInit(String),
}

/// Scene configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid time_step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f32),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Convenient result alias for fallible bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
