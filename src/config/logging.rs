//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives, overridden by `RUST_LOG` when set
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Installs the global tracing subscriber.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        if self.json {
            builder.json().init();
        } else {
            builder.init();
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,account_lifecycle=debug,sqlx=warn".to_string()
}
