//! Media Ports - capture devices, tracks and peer connections.
//!
//! The session manager owns what these hand out: streams it acquires and
//! connections it creates are released by the manager, never by the adapter.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::PeerId;
use crate::domain::media::{ConnectionState, MediaConstraints, PeerConfiguration, TrackKind};

/// A single captured audio or video track.
pub trait MediaTrack: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    /// Mutes/unmutes without releasing the device.
    fn set_enabled(&self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Releases the underlying device. Stopping twice is a no-op.
    fn stop(&self);

    fn is_stopped(&self) -> bool;
}

/// A bundle of tracks captured together.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Arc<dyn MediaTrack>] {
        &self.tracks
    }

    /// First track of the given kind, if any.
    pub fn first_track(&self, kind: TrackKind) -> Option<&Arc<dyn MediaTrack>> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    /// Stops every track in the stream.
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// Port for camera, microphone and screen capture.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Requests camera and/or microphone.
    async fn get_user_media(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaError>;

    /// Requests a screen capture.
    async fn get_display_media(&self) -> Result<MediaStream, MediaError>;
}

/// Events raised by a peer connection.
#[derive(Debug, Clone)]
pub enum PeerEvent {
    /// A local ICE candidate was gathered. Signaling is out of scope.
    IceCandidate(String),
    /// A remote stream arrived.
    Track(MediaStream),
    /// The connection state changed.
    StateChanged(ConnectionState),
}

/// Callback registered on a peer connection at construction.
pub type PeerEventSink = Arc<dyn Fn(PeerEvent) + Send + Sync>;

/// An established or establishing connection to one remote peer.
pub trait PeerConnection: Send + Sync {
    fn peer_id(&self) -> &PeerId;

    fn state(&self) -> ConnectionState;

    /// Closes the connection. Closing twice is a no-op.
    fn close(&self);
}

/// Port for constructing peer connections.
pub trait PeerConnectionFactory: Send + Sync {
    fn create(
        &self,
        peer_id: PeerId,
        configuration: &PeerConfiguration,
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerConnection>, MediaError>;
}

/// Media access and connection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("media permission denied: {0}")]
    PermissionDenied(String),

    #[error("media device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("peer connection failed: {0}")]
    PeerConnection(String),
}

impl MediaError {
    /// Returns true for the device-access class (permission or hardware).
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            MediaError::PermissionDenied(_) | MediaError::DeviceUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_errors_are_classified() {
        assert!(MediaError::PermissionDenied("user said no".into()).is_access_error());
        assert!(MediaError::DeviceUnavailable("no camera".into()).is_access_error());
        assert!(!MediaError::PeerConnection("ice failed".into()).is_access_error());
    }

    #[test]
    fn empty_stream_has_no_tracks() {
        let stream = MediaStream::new("s-1", Vec::new());
        assert!(stream.first_track(TrackKind::Video).is_none());
        stream.stop_all();
    }
}
