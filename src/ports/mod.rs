//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Provider Ports
//!
//! - `ConversationProvider` - Typed access to the conversational-video API
//! - `HttpTransport` - The wire underneath the provider client
//! - `CredentialSource` - The API key the provider client authenticates with
//!
//! ## Client Ports
//!
//! - `KeyValueStore` - Durable client-side storage for the credential
//! - `Notifier` - User-facing toast notifications
//!
//! ## Media Ports
//!
//! - `MediaDevices` - Camera, microphone and screen capture
//! - `PeerConnectionFactory` / `PeerConnection` - Peer-to-peer media links

mod conversation_provider;
mod credential_source;
mod http_transport;
mod key_value_store;
mod media_devices;
mod notifier;

pub use conversation_provider::{
    ConversationDetails, ConversationHandle, ConversationProvider, ConversationRequest,
    PerceptionLayer, PersonaDetails, PersonaHandle, PersonaLayers, PersonaRequest, ProviderError,
    Replica, SendMessageResponse,
};
pub use credential_source::{CredentialSource, StaticCredential};
pub use http_transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, SecretHeader, TransportError,
};
pub use key_value_store::{KeyValueStore, StorageError};
pub use media_devices::{
    MediaDevices, MediaError, MediaStream, MediaTrack, PeerConnection, PeerConnectionFactory,
    PeerEvent, PeerEventSink,
};
pub use notifier::{Notification, NotificationLevel, Notifier};
