//! MediaSessionManager - camera/microphone, peer connections and teardown.
//!
//! The manager exclusively owns the local stream and every peer connection
//! it creates. The remote-stream map is written only by the event handlers
//! registered in `create_peer_connection` (and wiped by `leave_session`).
//!
//! `leave_session` is idempotent and also runs on drop, so whatever owns the
//! manager releases devices on every exit path.
//!
//! Each session generation carries an epoch. Handlers and the delayed
//! connect task compare epochs before writing, so callbacks from a session
//! that was already left are ignored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::foundation::PeerId;
use crate::domain::media::{
    ConnectionState, MediaConstraints, Participant, PeerConfiguration, TrackKind,
};
use crate::ports::{
    MediaDevices, MediaError, MediaStream, Notifier, PeerConnection, PeerConnectionFactory,
    PeerEvent, PeerEventSink,
};

/// Media tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSettings {
    pub peer_configuration: PeerConfiguration,
    pub constraints: MediaConstraints,
    /// Simulated signaling latency before a joined session reports connected.
    pub connect_delay: Duration,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            peer_configuration: PeerConfiguration::default(),
            constraints: MediaConstraints::call(),
            connect_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug)]
struct MediaState {
    local_stream: Option<MediaStream>,
    remote_streams: HashMap<PeerId, MediaStream>,
    participants: HashMap<PeerId, Participant>,
    connected: bool,
    video_enabled: bool,
    audio_enabled: bool,
    screen_sharing: bool,
    room_id: Option<String>,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            local_stream: None,
            remote_streams: HashMap::new(),
            participants: HashMap::new(),
            connected: false,
            video_enabled: true,
            audio_enabled: true,
            screen_sharing: false,
            room_id: None,
        }
    }
}

impl MediaState {
    fn is_active(&self) -> bool {
        self.local_stream.is_some()
            || !self.remote_streams.is_empty()
            || !self.participants.is_empty()
            || self.connected
            || self.room_id.is_some()
    }
}

/// Read-only view of the media session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSnapshot {
    pub local_stream_id: Option<String>,
    pub remote_peers: Vec<PeerId>,
    pub participants: Vec<PeerId>,
    pub connected: bool,
    pub video_enabled: bool,
    pub audio_enabled: bool,
    pub screen_sharing: bool,
    pub room_id: Option<String>,
}

type SharedState = Arc<RwLock<MediaState>>;

fn read(state: &RwLock<MediaState>) -> RwLockReadGuard<'_, MediaState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &RwLock<MediaState>) -> RwLockWriteGuard<'_, MediaState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct MediaSessionManager {
    devices: Arc<dyn MediaDevices>,
    peers: Arc<dyn PeerConnectionFactory>,
    notifier: Arc<dyn Notifier>,
    settings: MediaSettings,
    state: SharedState,
    connections: Mutex<HashMap<PeerId, Arc<dyn PeerConnection>>>,
    connect_task: Mutex<Option<JoinHandle<()>>>,
    epoch: Arc<AtomicU64>,
}

impl MediaSessionManager {
    pub fn new(
        devices: Arc<dyn MediaDevices>,
        peers: Arc<dyn PeerConnectionFactory>,
        notifier: Arc<dyn Notifier>,
        settings: MediaSettings,
    ) -> Self {
        Self {
            devices,
            peers,
            notifier,
            settings,
            state: Arc::new(RwLock::new(MediaState::default())),
            connections: Mutex::new(HashMap::new()),
            connect_task: Mutex::new(None),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Requests camera and microphone with the given constraints.
    ///
    /// On failure the user is notified and the error is returned; the caller
    /// decides whether to continue without media.
    pub async fn acquire_local_media(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaError> {
        match self.devices.get_user_media(constraints).await {
            Ok(stream) => {
                self.install_local_stream(stream.clone(), false);
                tracing::info!(stream = stream.id(), "local media acquired");
                Ok(stream)
            }
            Err(e) => {
                tracing::error!("Error accessing media devices: {}", e);
                self.notifier.error("Failed to access camera and microphone");
                Err(e)
            }
        }
    }

    /// Acquires media with the configured call constraints.
    pub async fn acquire_default_media(&self) -> Result<MediaStream, MediaError> {
        let constraints = self.settings.constraints;
        self.acquire_local_media(&constraints).await
    }

    /// Builds a connection to `peer_id` with the configured STUN servers and
    /// wires its events into the session. Replaces any existing connection
    /// to the same peer.
    pub fn create_peer_connection(&self, peer_id: PeerId) -> Result<Arc<dyn PeerConnection>, MediaError> {
        let sink = Self::event_sink(
            peer_id.clone(),
            Arc::downgrade(&self.state),
            self.epoch.clone(),
            self.epoch.load(Ordering::SeqCst),
        );

        let connection = self
            .peers
            .create(peer_id.clone(), &self.settings.peer_configuration, sink)
            .map_err(|e| {
                tracing::error!(peer = %peer_id, "Failed to create peer connection: {}", e);
                e
            })?;

        let previous = self.connections().insert(peer_id.clone(), connection.clone());
        if let Some(previous) = previous {
            previous.close();
        }
        tracing::debug!(peer = %peer_id, "peer connection created");
        Ok(connection)
    }

    /// Records a participant that announced itself through signaling.
    pub fn add_participant(&self, participant: Participant) {
        write(&self.state)
            .participants
            .insert(participant.peer_id.clone(), participant);
    }

    /// Acquires media for `room_id` and reports connected after the
    /// configured delay, unless the session is left first.
    pub async fn join_session(&self, room_id: impl Into<String>) -> Result<MediaStream, MediaError> {
        let stream = match self.acquire_default_media().await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Error joining room: {}", e);
                self.notifier.error("Failed to join video chat");
                return Err(e);
            }
        };

        let room_id = room_id.into();
        write(&self.state).room_id = Some(room_id.clone());
        tracing::info!(room = %room_id, "joining media session");

        let epoch = self.epoch.load(Ordering::SeqCst);
        let current = self.epoch.clone();
        let state = Arc::downgrade(&self.state);
        let notifier = self.notifier.clone();
        let delay = self.settings.connect_delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != epoch {
                return;
            }
            let Some(state) = state.upgrade() else {
                return;
            };
            write(&state).connected = true;
            notifier.success("Connected to video chat");
        });

        let previous = self.connect_slot().replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }

        Ok(stream)
    }

    /// Flips the first local video track. Returns the new flag.
    pub fn toggle_video(&self) -> bool {
        self.toggle(TrackKind::Video)
    }

    /// Flips the first local audio track. Returns the new flag.
    pub fn toggle_audio(&self) -> bool {
        self.toggle(TrackKind::Audio)
    }

    /// Swaps between camera and screen capture. The replaced stream's
    /// tracks are stopped. On failure the current stream is kept.
    pub async fn toggle_screen_share(&self) -> Result<bool, MediaError> {
        let sharing = read(&self.state).screen_sharing;

        let result = if sharing {
            let constraints = self.settings.constraints;
            self.devices.get_user_media(&constraints).await
        } else {
            self.devices.get_display_media().await
        };

        match result {
            Ok(stream) => {
                self.install_local_stream(stream, !sharing);
                Ok(!sharing)
            }
            Err(e) => {
                tracing::error!("Error toggling screen share: {}", e);
                Err(e)
            }
        }
    }

    /// Closes every peer connection and releases all session state.
    /// Safe to call any number of times.
    pub fn leave_session(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let pending_connect = self.connect_slot().take();
        if let Some(task) = pending_connect {
            task.abort();
        }

        let connections: Vec<_> = self.connections().drain().map(|(_, c)| c).collect();
        for connection in &connections {
            connection.close();
        }

        let previous = std::mem::take(&mut *write(&self.state));
        if let Some(stream) = &previous.local_stream {
            stream.stop_all();
        }
        for stream in previous.remote_streams.values() {
            stream.stop_all();
        }

        if previous.is_active() || !connections.is_empty() {
            tracing::info!(connections = connections.len(), "left media session");
            self.notifier.success("Left video chat");
        }
    }

    pub fn snapshot(&self) -> MediaSnapshot {
        let state = read(&self.state);
        let mut remote_peers: Vec<PeerId> = state.remote_streams.keys().cloned().collect();
        remote_peers.sort();
        let mut participants: Vec<PeerId> = state.participants.keys().cloned().collect();
        participants.sort();

        MediaSnapshot {
            local_stream_id: state.local_stream.as_ref().map(|s| s.id().to_string()),
            remote_peers,
            participants,
            connected: state.connected,
            video_enabled: state.video_enabled,
            audio_enabled: state.audio_enabled,
            screen_sharing: state.screen_sharing,
            room_id: state.room_id.clone(),
        }
    }

    pub fn local_stream(&self) -> Option<MediaStream> {
        read(&self.state).local_stream.clone()
    }

    pub fn remote_stream(&self, peer_id: &PeerId) -> Option<MediaStream> {
        read(&self.state).remote_streams.get(peer_id).cloned()
    }

    pub fn is_connected(&self) -> bool {
        read(&self.state).connected
    }

    pub fn connection_count(&self) -> usize {
        self.connections().len()
    }

    fn connections(&self) -> MutexGuard<'_, HashMap<PeerId, Arc<dyn PeerConnection>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.connect_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn install_local_stream(&self, stream: MediaStream, screen_sharing: bool) {
        let replaced = {
            let mut state = write(&self.state);
            state.video_enabled = true;
            state.audio_enabled = true;
            state.screen_sharing = screen_sharing;
            state.local_stream.replace(stream)
        };
        if let Some(old) = replaced {
            old.stop_all();
        }
    }

    fn toggle(&self, kind: TrackKind) -> bool {
        let mut state = write(&self.state);
        let current = match kind {
            TrackKind::Video => state.video_enabled,
            TrackKind::Audio => state.audio_enabled,
        };

        let Some(track) = state
            .local_stream
            .as_ref()
            .and_then(|s| s.first_track(kind))
            .cloned()
        else {
            return current;
        };

        let enabled = !current;
        track.set_enabled(enabled);
        match kind {
            TrackKind::Video => state.video_enabled = enabled,
            TrackKind::Audio => state.audio_enabled = enabled,
        }
        enabled
    }

    fn event_sink(
        peer_id: PeerId,
        state: Weak<RwLock<MediaState>>,
        current: Arc<AtomicU64>,
        epoch: u64,
    ) -> PeerEventSink {
        Arc::new(move |event| {
            if current.load(Ordering::SeqCst) != epoch {
                tracing::debug!(peer = %peer_id, "event from a left session ignored");
                return;
            }
            let Some(state) = state.upgrade() else {
                return;
            };

            match event {
                PeerEvent::IceCandidate(candidate) => {
                    tracing::debug!(peer = %peer_id, "ICE candidate: {}", candidate);
                }
                PeerEvent::Track(stream) => {
                    write(&state).remote_streams.insert(peer_id.clone(), stream);
                }
                PeerEvent::StateChanged(connection_state) => {
                    tracing::info!(peer = %peer_id, ?connection_state, "connection state changed");
                    match connection_state {
                        ConnectionState::Connected => write(&state).connected = true,
                        ConnectionState::Disconnected => {
                            let mut state = write(&state);
                            state.participants.remove(&peer_id);
                            state.remote_streams.remove(&peer_id);
                        }
                        _ => {}
                    }
                }
            }
        })
    }
}

impl Drop for MediaSessionManager {
    fn drop(&mut self) {
        self.leave_session();
    }
}
