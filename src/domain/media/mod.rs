//! Media module - capture constraints and peer connection vocabulary.

mod connection;
mod constraints;

pub use connection::{ConnectionState, IceServer, Participant, PeerConfiguration};
pub use constraints::{AudioConstraints, MediaConstraints, TrackKind, VideoConstraints};
