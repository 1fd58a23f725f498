//! Peer connection configuration and lifecycle states.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PeerId, Timestamp};

/// Connection state reported by a peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// A STUN/TURN server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: String,
}

impl IceServer {
    pub fn new(urls: impl Into<String>) -> Self {
        Self { urls: urls.into() }
    }
}

/// Configuration handed to every new peer connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfiguration {
    pub ice_servers: Vec<IceServer>,
}

impl PeerConfiguration {
    pub fn new<I, S>(stun_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ice_servers: stun_urls.into_iter().map(IceServer::new).collect(),
        }
    }
}

impl Default for PeerConfiguration {
    fn default() -> Self {
        Self::new(["stun:stun.l.google.com:19302", "stun:stun1.l.google.com:19302"])
    }
}

/// A remote participant in a media session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub peer_id: PeerId,
    pub display_name: Option<String>,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            display_name: None,
            joined_at: Timestamp::now(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}
