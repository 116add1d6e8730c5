//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and token lifetimes
//! - `cleanup` - expired refresh token sweep schedule
//! - `database` - database connection and pool configuration
//! - `environment` - environment detection and logging configuration

pub mod auth;
pub mod cleanup;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, DEFAULT_JWT_SECRET};
pub use cleanup::CleanupConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides, e.g. `DM_AUTH__JWT__SECRET`
pub const ENV_PREFIX: &str = "DM";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Expired token sweep configuration
    pub cleanup: CleanupConfig,
}

impl AppConfig {
    /// Load configuration for the environment named by `ENVIRONMENT`
    ///
    /// Sources, lowest precedence first:
    /// 1. built-in defaults
    /// 2. `config.<environment>.toml` in the working directory (optional)
    /// 3. `DM_`-prefixed environment variables, `__` separating nested keys
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_for(Environment::from_env())
    }

    /// Load configuration for an explicit environment
    pub fn load_for(environment: Environment) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override("environment", environment.to_string())?
            .build()?;

        let mut app: AppConfig = settings.clone().try_deserialize()?;

        // Logging defaults differ per environment; only keep the deserialized
        // section when one was actually provided.
        if settings.get_table("logging").is_err() {
            app.logging = LoggingConfig::for_environment(environment);
        }

        Ok(app)
    }
}
