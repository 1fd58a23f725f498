//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("At least one STUN server is required")]
    NoStunServers,

    #[error("Invalid ICE server URL: {0}")]
    InvalidIceServer(String),

    #[error("Response delay must not exceed {max_ms}ms")]
    ResponseDelayTooLong { max_ms: u64 },

    #[error("Connect delay must not exceed {max_ms}ms")]
    ConnectDelayTooLong { max_ms: u64 },

    #[error("Invalid video constraints")]
    InvalidVideoConstraints,
}
