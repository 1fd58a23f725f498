//! Simulated capture devices.
//!
//! Hands out tracks that behave like real ones (enable flag, stop flag) so
//! the session manager's resource handling can be observed without hardware.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::media::{MediaConstraints, TrackKind};
use crate::ports::{MediaDevices, MediaError, MediaStream, MediaTrack};

/// A track with observable state.
#[derive(Debug)]
pub struct SimulatedTrack {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
    stopped: AtomicBool,
}

impl SimulatedTrack {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            enabled: AtomicBool::new(true),
            stopped: AtomicBool::new(false),
        }
    }
}

impl MediaTrack for SimulatedTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Builds a stream of fresh simulated tracks.
pub fn simulated_stream(id: impl Into<String>, kinds: &[TrackKind]) -> MediaStream {
    let id = id.into();
    let tracks = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            Arc::new(SimulatedTrack::new(format!("{}-track-{}", id, i), *kind)) as Arc<dyn MediaTrack>
        })
        .collect();
    MediaStream::new(id, tracks)
}

#[derive(Debug, Default)]
struct DeviceBehavior {
    user_media_error: Option<MediaError>,
    display_media_error: Option<MediaError>,
}

/// Camera, microphone and screen that always exist unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMediaDevices {
    behavior: Arc<Mutex<DeviceBehavior>>,
    acquired: Arc<Mutex<Vec<MediaStream>>>,
    counter: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedMediaDevices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes camera/microphone requests fail, e.g. with a permission denial.
    pub fn failing_with(self, error: MediaError) -> Self {
        lock(&self.behavior).user_media_error = Some(error);
        self
    }

    /// Makes screen capture requests fail.
    pub fn failing_display_with(self, error: MediaError) -> Self {
        lock(&self.behavior).display_media_error = Some(error);
        self
    }

    /// Every stream handed out so far, in order.
    pub fn acquired(&self) -> Vec<MediaStream> {
        lock(&self.acquired).clone()
    }

    /// True if every track ever handed out has been stopped.
    pub fn all_released(&self) -> bool {
        lock(&self.acquired)
            .iter()
            .flat_map(|s| s.tracks().iter())
            .all(|t| t.is_stopped())
    }

    fn hand_out(&self, prefix: &str, kinds: &[TrackKind]) -> MediaStream {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let stream = simulated_stream(format!("{}-{}", prefix, n), kinds);
        lock(&self.acquired).push(stream.clone());
        stream
    }
}

#[async_trait]
impl MediaDevices for SimulatedMediaDevices {
    async fn get_user_media(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaError> {
        if let Some(err) = lock(&self.behavior).user_media_error.clone() {
            return Err(err);
        }
        if !constraints.requests_anything() {
            return Err(MediaError::DeviceUnavailable(
                "no media kinds requested".to_string(),
            ));
        }

        let kinds: Vec<TrackKind> = [TrackKind::Audio, TrackKind::Video]
            .into_iter()
            .filter(|k| constraints.requests(*k))
            .collect();
        Ok(self.hand_out("camera", &kinds))
    }

    async fn get_display_media(&self) -> Result<MediaStream, MediaError> {
        if let Some(err) = lock(&self.behavior).display_media_error.clone() {
            return Err(err);
        }
        Ok(self.hand_out("screen", &[TrackKind::Video, TrackKind::Audio]))
    }
}
