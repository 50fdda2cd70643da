//! Environment configuration for different deployment stages

use std::env;

use tracing::Level;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether logs are emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Default log level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
