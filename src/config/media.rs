//! Media session configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::media::{AudioConstraints, MediaConstraints, PeerConfiguration, VideoConstraints};

use super::error::ValidationError;

const MAX_CONNECT_DELAY_MS: u64 = 30_000;

/// Media configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaConfig {
    /// STUN/TURN servers handed to every peer connection
    #[serde(default = "default_stun_servers")]
    pub stun_servers: Vec<String>,

    /// Simulated signaling latency when joining a session
    #[serde(default = "default_connect_delay")]
    pub connect_delay_ms: u64,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    #[serde(default = "default_true")]
    pub echo_cancellation: bool,

    #[serde(default = "default_true")]
    pub noise_suppression: bool,

    #[serde(default = "default_true")]
    pub auto_gain_control: bool,
}

impl MediaConfig {
    pub fn peer_configuration(&self) -> PeerConfiguration {
        PeerConfiguration::new(self.stun_servers.iter().cloned())
    }

    pub fn constraints(&self) -> MediaConstraints {
        MediaConstraints {
            video: Some(VideoConstraints {
                width: self.width,
                height: self.height,
                frame_rate: self.frame_rate,
            }),
            audio: Some(AudioConstraints {
                echo_cancellation: self.echo_cancellation,
                noise_suppression: self.noise_suppression,
                auto_gain_control: self.auto_gain_control,
            }),
        }
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Validate media configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stun_servers.is_empty() {
            return Err(ValidationError::NoStunServers);
        }
        if let Some(bad) = self
            .stun_servers
            .iter()
            .find(|s| !(s.starts_with("stun:") || s.starts_with("turn:")))
        {
            return Err(ValidationError::InvalidIceServer(bad.clone()));
        }
        if self.connect_delay_ms > MAX_CONNECT_DELAY_MS {
            return Err(ValidationError::ConnectDelayTooLong {
                max_ms: MAX_CONNECT_DELAY_MS,
            });
        }
        if self.width == 0 || self.height == 0 || self.frame_rate == 0 {
            return Err(ValidationError::InvalidVideoConstraints);
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            stun_servers: default_stun_servers(),
            connect_delay_ms: default_connect_delay(),
            width: default_width(),
            height: default_height(),
            frame_rate: default_frame_rate(),
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

fn default_stun_servers() -> Vec<String> {
    vec![
        "stun:stun.l.google.com:19302".to_string(),
        "stun:stun1.l.google.com:19302".to_string(),
    ]
}

fn default_connect_delay() -> u64 {
    1000
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_frame_rate() -> u32 {
    30
}

fn default_true() -> bool {
    true
}
