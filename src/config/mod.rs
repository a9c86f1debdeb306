//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `ACCOUNT_LIFECYCLE`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use account_lifecycle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Grace period: {} days", config.deletion.grace_period_days);
//! ```

mod database;
mod deletion;
mod dispatcher;
mod error;
mod identity;
mod logging;
mod storage;

pub use database::DatabaseConfig;
pub use deletion::DeletionConfig;
pub use dispatcher::DispatcherConfig;
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::application::ScheduleDispatcherConfig;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Grace period and scheduler naming
    #[serde(default)]
    pub deletion: DeletionConfig,

    /// Polling of fired schedules
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Identity provider management API
    pub identity: IdentityConfig,

    /// Object storage for user media
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `ACCOUNT_LIFECYCLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ACCOUNT_LIFECYCLE__DATABASE__URL=...` -> `database.url = ...`
    /// - `ACCOUNT_LIFECYCLE__DELETION__GRACE_PERIOD_DAYS=30` -> `deletion.grace_period_days = 30`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ACCOUNT_LIFECYCLE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.deletion.validate()?;
        self.dispatcher.validate()?;
        self.identity.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Dispatcher settings, targeting the configured worker.
    pub fn dispatcher_config(&self) -> ScheduleDispatcherConfig {
        ScheduleDispatcherConfig::default()
            .with_poll_interval(self.dispatcher.poll_interval())
            .with_batch_size(self.dispatcher.batch_size)
            .with_target(self.deletion.worker_target.clone())
    }
}
