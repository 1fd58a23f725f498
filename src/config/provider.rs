//! Conversation provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::credential::Credential;

use super::error::ValidationError;

/// Provider (Tavus) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of embeddable conversation pages
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,

    /// Replaces the built-in demo key as the default credential
    pub default_api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// File holding the user's saved credential
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,
}

impl ProviderConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The default credential: configured key, else the built-in one.
    pub fn default_credential(&self) -> Credential {
        self.default_api_key
            .as_ref()
            .map(|k| Credential::new(k.expose_secret().as_str()))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(Credential::builtin)
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("provider.base_url"));
        }
        if !is_http_url(&self.embed_base_url) {
            return Err(ValidationError::InvalidUrl("provider.embed_base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.credential_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("provider.credential_path"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embed_base_url: default_embed_base_url(),
            default_api_key: None,
            timeout_secs: default_timeout(),
            credential_path: default_credential_path(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_base_url() -> String {
    "https://tavusapi.com/v2".to_string()
}

fn default_embed_base_url() -> String {
    "https://tavusapi.com/conversations".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_credential_path() -> PathBuf {
    PathBuf::from("./data/echo-storage.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::DEFAULT_CREDENTIAL;

    #[test]
    fn test_provider_config_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.base_url, "https://tavusapi.com/v2");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_credential_falls_back_to_builtin() {
        let config = ProviderConfig::default();
        assert_eq!(config.default_credential().expose(), DEFAULT_CREDENTIAL);

        let config = ProviderConfig {
            default_api_key: Some(SecretString::new("  ".to_string())),
            ..Default::default()
        };
        assert_eq!(config.default_credential().expose(), DEFAULT_CREDENTIAL);
    }

    #[test]
    fn test_configured_default_credential() {
        let config = ProviderConfig {
            default_api_key: Some(SecretString::new("team-key".to_string())),
            ..Default::default()
        };
        assert_eq!(config.default_credential().expose(), "team-key");
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = ProviderConfig {
            base_url: "ftp://tavusapi.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("provider.base_url"))
        );
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ProviderConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
