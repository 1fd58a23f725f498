//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ECHO` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use echo::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Provider at {}", config.provider.base_url);
//! ```

mod conversation;
mod error;
mod media;
mod provider;

pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use media::MediaConfig;
pub use provider::ProviderConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment is a valid
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Provider configuration (Tavus API)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Conversation session configuration
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Media session configuration
    #[serde(default)]
    pub media: MediaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ECHO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ECHO__PROVIDER__TIMEOUT_SECS=10` -> `provider.timeout_secs = 10`
    /// - `ECHO__MEDIA__STUN_SERVERS=stun:a:3478,stun:b:3478` -> comma-separated list
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ECHO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("media.stun_servers")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL schemes
    /// - Timeout and delay bounds
    /// - ICE server formats
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.provider.validate()?;
        self.conversation.validate()?;
        self.media.validate()?;
        Ok(())
    }
}
