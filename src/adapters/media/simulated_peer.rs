//! Simulated peer connections.
//!
//! The factory keeps every connection it builds so a test (or a demo
//! driver) can push ICE candidates, remote tracks and state changes
//! through the handlers the session manager registered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::PeerId;
use crate::domain::media::{ConnectionState, PeerConfiguration};
use crate::ports::{
    MediaError, MediaStream, PeerConnection, PeerConnectionFactory, PeerEvent, PeerEventSink,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A connection whose remote side is driven by hand.
pub struct SimulatedPeerConnection {
    peer_id: PeerId,
    configuration: PeerConfiguration,
    state: Mutex<ConnectionState>,
    closed: AtomicBool,
    events: PeerEventSink,
}

impl SimulatedPeerConnection {
    fn new(peer_id: PeerId, configuration: PeerConfiguration, events: PeerEventSink) -> Self {
        Self {
            peer_id,
            configuration,
            state: Mutex::new(ConnectionState::New),
            closed: AtomicBool::new(false),
            events,
        }
    }

    pub fn configuration(&self) -> &PeerConfiguration {
        &self.configuration
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Raises a gathered ICE candidate.
    pub fn emit_candidate(&self, candidate: impl Into<String>) {
        if !self.is_closed() {
            (self.events)(PeerEvent::IceCandidate(candidate.into()));
        }
    }

    /// Delivers a remote stream.
    pub fn deliver_track(&self, stream: MediaStream) {
        if !self.is_closed() {
            (self.events)(PeerEvent::Track(stream));
        }
    }

    /// Moves to `state` and raises the change. Closed connections stay silent.
    pub fn transition(&self, state: ConnectionState) {
        if self.is_closed() {
            return;
        }
        *lock(&self.state) = state;
        (self.events)(PeerEvent::StateChanged(state));
    }
}

impl PeerConnection for SimulatedPeerConnection {
    fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    fn state(&self) -> ConnectionState {
        *lock(&self.state)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            *lock(&self.state) = ConnectionState::Closed;
        }
    }
}

/// Factory that remembers what it built.
#[derive(Clone, Default)]
pub struct SimulatedPeerFactory {
    connections: Arc<Mutex<Vec<Arc<SimulatedPeerConnection>>>>,
    failure: Arc<Mutex<Option<MediaError>>>,
}

impl SimulatedPeerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `create` fail.
    pub fn failing_with(self, error: MediaError) -> Self {
        *lock(&self.failure) = Some(error);
        self
    }

    /// The most recent connection built for `peer_id`.
    pub fn connection(&self, peer_id: &PeerId) -> Option<Arc<SimulatedPeerConnection>> {
        lock(&self.connections)
            .iter()
            .rev()
            .find(|c| &c.peer_id == peer_id)
            .cloned()
    }

    /// Every connection built so far.
    pub fn connections(&self) -> Vec<Arc<SimulatedPeerConnection>> {
        lock(&self.connections).clone()
    }
}

impl PeerConnectionFactory for SimulatedPeerFactory {
    fn create(
        &self,
        peer_id: PeerId,
        configuration: &PeerConfiguration,
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerConnection>, MediaError> {
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }
        let connection = Arc::new(SimulatedPeerConnection::new(
            peer_id,
            configuration.clone(),
            events,
        ));
        lock(&self.connections).push(connection.clone());
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_sink() -> (PeerEventSink, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: PeerEventSink = Arc::new(move |event| {
            let label = match event {
                PeerEvent::IceCandidate(_) => "candidate".to_string(),
                PeerEvent::Track(_) => "track".to_string(),
                PeerEvent::StateChanged(s) => format!("{:?}", s),
            };
            sink_seen.lock().unwrap().push(label);
        });
        (sink, seen)
    }

    #[test]
    fn events_flow_until_closed() {
        let factory = SimulatedPeerFactory::new();
        let (sink, seen) = counting_sink();
        let peer = PeerId::new("p1");
        let handle = factory.create(peer.clone(), &PeerConfiguration::default(), sink).unwrap();
        let sim = factory.connection(&peer).unwrap();

        sim.emit_candidate("candidate:1");
        sim.transition(ConnectionState::Connected);
        handle.close();
        sim.transition(ConnectionState::Disconnected);

        assert_eq!(*seen.lock().unwrap(), vec!["candidate", "Connected"]);
        assert_eq!(handle.state(), ConnectionState::Closed);
    }

    #[test]
    fn failing_factory_returns_error() {
        let factory =
            SimulatedPeerFactory::new().failing_with(MediaError::PeerConnection("no ice".into()));
        let (sink, _) = counting_sink();

        assert!(factory
            .create(PeerId::new("p"), &PeerConfiguration::default(), sink)
            .is_err());
        assert!(factory.connections().is_empty());
    }
}
