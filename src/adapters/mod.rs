//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Key/value stores (YAML file, in-memory)
//! - `transport` - HTTP transports (reqwest, mock)
//! - `tavus` - Conversation provider clients (Tavus, mock)
//! - `notify` - Notification sinks (tracing, recording)
//! - `media` - Simulated capture devices and peer connections

pub mod media;
pub mod notify;
pub mod storage;
pub mod tavus;
pub mod transport;

pub use media::{SimulatedMediaDevices, SimulatedPeerFactory};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use tavus::{MockConversationProvider, TavusConfig, TavusProvider};
pub use transport::{MockTransport, ReqwestTransport};
