//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a chat message.
///
/// Generated locally; the provider never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Declares an opaque identifier assigned by someone other than this crate
/// (the provider, the catalog, or a remote peer).
macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an externally assigned identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

external_id!(
    /// Catalog identifier of a persona descriptor (e.g. `santa-claus`).
    PersonaId
);

external_id!(
    /// Provider-side avatar model identifier.
    ReplicaId
);

external_id!(
    /// Provider-side behavior profile identifier.
    ProviderPersonaId
);

external_id!(
    /// Provider-assigned conversation session identifier.
    ConversationId
);

external_id!(
    /// Identifier of a remote peer in a media session.
    PeerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    #[test]
    fn message_id_round_trips_through_string() {
        let id = MessageId::new();
        let parsed: MessageId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn external_ids_serialize_transparently() {
        let id = ReplicaId::new("r3fbe3834a3e");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r3fbe3834a3e\"");
        assert_eq!(id.as_str(), "r3fbe3834a3e");
    }

    #[test]
    fn peer_id_converts_from_str() {
        let peer: PeerId = "peer-1".into();
        assert_eq!(peer.to_string(), "peer-1");
    }
}
