//! Conversation Provider Port - typed façade over the conversational-video API.
//!
//! Abstracts the provider's HTTP API (personas, conversations, replicas,
//! messages) so the session layer never touches JSON or status codes.
//!
//! # Error convention
//!
//! - No credential: `ProviderError::Configuration`, raised before any I/O
//! - Non-2xx response: `ProviderError::Api { status, message }`
//! - Nothing came back: `ProviderError::Network` / `ProviderError::Timeout`
//!
//! Callers recover from all of these the same way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{ConversationId, ProviderPersonaId, ReplicaId};
use crate::domain::persona::PersonaDescriptor;

use super::http_transport::TransportError;

/// Port for provider interactions.
#[async_trait]
pub trait ConversationProvider: Send + Sync {
    /// Creates a provider-side behavior profile.
    async fn create_persona(&self, request: PersonaRequest) -> Result<PersonaHandle, ProviderError>;

    /// Creates a conversation session with a replica.
    async fn create_conversation(
        &self,
        request: ConversationRequest,
    ) -> Result<ConversationHandle, ProviderError>;

    /// Lists available replicas. A response without the list yields an empty vec.
    async fn list_replicas(&self) -> Result<Vec<Replica>, ProviderError>;

    /// Sends a user message into a live conversation.
    async fn send_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<SendMessageResponse, ProviderError>;

    /// Fetches a provider persona.
    async fn get_persona(&self, persona_id: &ProviderPersonaId) -> Result<PersonaDetails, ProviderError>;

    /// Fetches a conversation.
    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationDetails, ProviderError>;

    /// Embeddable page for a conversation.
    fn embed_url(&self, conversation_id: &ConversationId) -> String;

    /// True if the current credential can list replicas. Never fails.
    async fn validate_credential(&self) -> bool {
        match self.list_replicas().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Credential validation failed: {}", e);
                false
            }
        }
    }
}

/// Body of `POST /personas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaRequest {
    pub persona_name: String,
    pub default_replica_id: ReplicaId,
    pub system_prompt: String,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<PersonaLayers>,
}

impl PersonaRequest {
    /// Builds a request from a catalog entry.
    pub fn from_descriptor(persona: &PersonaDescriptor) -> Self {
        Self {
            persona_name: persona.name.clone(),
            default_replica_id: persona.replica_id.clone(),
            system_prompt: persona.system_prompt.clone(),
            context: persona.context.clone(),
            layers: None,
        }
    }

    /// Adds a perception layer.
    pub fn with_perception(
        mut self,
        perception_model: impl Into<String>,
        ambient_awareness_queries: Vec<String>,
    ) -> Self {
        self.layers = Some(PersonaLayers {
            perception: Some(PerceptionLayer {
                perception_model: perception_model.into(),
                ambient_awareness_queries,
            }),
        });
        self
    }
}

/// Optional behavior layers of a provider persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaLayers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perception: Option<PerceptionLayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerceptionLayer {
    pub perception_model: String,
    pub ambient_awareness_queries: Vec<String>,
}

/// Response of `POST /personas`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonaHandle {
    pub persona_id: ProviderPersonaId,
    #[serde(default)]
    pub persona_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// Body of `POST /conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationRequest {
    pub replica_id: ReplicaId,
    pub conversation_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<ProviderPersonaId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl ConversationRequest {
    pub fn new(replica_id: ReplicaId, conversation_name: impl Into<String>) -> Self {
        Self {
            replica_id,
            conversation_name: conversation_name.into(),
            persona_id: None,
            callback_url: None,
        }
    }

    pub fn with_persona(mut self, persona_id: Option<ProviderPersonaId>) -> Self {
        self.persona_id = persona_id;
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

/// Response of `POST /conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationHandle {
    pub conversation_id: ConversationId,
    pub conversation_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// A provider avatar model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replica {
    pub replica_id: ReplicaId,
    #[serde(default)]
    pub replica_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    pub thumbnail_url: Option<String>,
}

/// Response of `POST /conversations/{id}/messages`. Only `message` is interpreted.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SendMessageResponse {
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /personas/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonaDetails {
    pub persona_id: ProviderPersonaId,
    pub persona_name: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /conversations/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationDetails {
    pub conversation_id: ConversationId,
    pub conversation_url: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No usable credential; nothing was sent.
    #[error("Tavus API key not configured. Please set your API key first.")]
    Configuration,

    /// Provider answered with a non-success status.
    #[error("Tavus API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Success status but the body was not what we expected.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true for the missing-credential precondition.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::Configuration)
    }

    /// Returns true if nothing came back from the provider.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::Timeout { .. })
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { timeout_secs } => ProviderError::Timeout { timeout_secs },
            TransportError::Connect(msg) => {
                ProviderError::network(format!("Connection failed: {}", msg))
            }
            TransportError::Other(msg) => ProviderError::network(msg),
        }
    }
}
