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

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Grace period must be at least one day")]
    InvalidGracePeriod,

    #[error("Schedule group must be non-empty and contain no '/'")]
    InvalidScheduleGroup,

    #[error("Dispatcher poll interval must be positive")]
    InvalidPollInterval,

    #[error("Dispatcher batch size must be between 1 and 1000")]
    InvalidBatchSize,

    #[error("Identity provider URL must use HTTP or HTTPS")]
    InvalidIdentityUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid object key prefix")]
    InvalidAvatarPrefix,
}
