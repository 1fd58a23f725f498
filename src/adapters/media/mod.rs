//! Media adapters.
//!
//! Simulated devices and peer connections. They stand in for a platform
//! WebRTC stack in the terminal front end and in tests.

mod simulated_devices;
mod simulated_peer;

pub use simulated_devices::{simulated_stream, SimulatedMediaDevices, SimulatedTrack};
pub use simulated_peer::{SimulatedPeerConnection, SimulatedPeerFactory};
