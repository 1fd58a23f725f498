//! Conversation session configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::conversation::ResponseDelay;

use super::error::ValidationError;

/// Upper bound on base + jitter.
const MAX_RESPONSE_DELAY_MS: u64 = 60_000;

/// Conversation configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationConfig {
    /// Fixed part of the reply delay
    #[serde(default = "default_delay_base")]
    pub response_delay_base_ms: u64,

    /// Random part of the reply delay
    #[serde(default = "default_delay_jitter")]
    pub response_delay_jitter_ms: u64,

    /// Provider conversations are named "<prefix> - <persona name>"
    #[serde(default = "default_name_prefix")]
    pub conversation_name_prefix: String,

    /// Optional provider webhook
    pub callback_url: Option<String>,
}

impl ConversationConfig {
    pub fn response_delay(&self) -> ResponseDelay {
        ResponseDelay::new(
            Duration::from_millis(self.response_delay_base_ms),
            Duration::from_millis(self.response_delay_jitter_ms),
        )
    }

    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let total = self
            .response_delay_base_ms
            .saturating_add(self.response_delay_jitter_ms);
        if total > MAX_RESPONSE_DELAY_MS {
            return Err(ValidationError::ResponseDelayTooLong {
                max_ms: MAX_RESPONSE_DELAY_MS,
            });
        }
        if self.conversation_name_prefix.trim().is_empty() {
            return Err(ValidationError::MissingRequired(
                "conversation.conversation_name_prefix",
            ));
        }
        if let Some(url) = &self.callback_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::InvalidUrl("conversation.callback_url"));
            }
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            response_delay_base_ms: default_delay_base(),
            response_delay_jitter_ms: default_delay_jitter(),
            conversation_name_prefix: default_name_prefix(),
            callback_url: None,
        }
    }
}

fn default_delay_base() -> u64 {
    1000
}

fn default_delay_jitter() -> u64 {
    2000
}

fn default_name_prefix() -> String {
    "Echo Demo".to_string()
}
