//! Tavus Provider - ConversationProvider over the Tavus v2 HTTP API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TavusConfig::new()
//!     .with_base_url("https://tavusapi.com/v2");
//!
//! let provider = TavusProvider::new(config, credentials, transport);
//! ```
//!
//! # Authentication
//!
//! Every request carries the active credential in the `x-api-key` header.
//! An empty credential fails with `ProviderError::Configuration` before the
//! transport is touched.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::foundation::{ConversationId, ProviderPersonaId};
use crate::ports::{
    ConversationDetails, ConversationHandle, ConversationProvider, ConversationRequest,
    CredentialSource, HttpRequest, HttpResponse, HttpTransport, PersonaDetails, PersonaHandle,
    PersonaRequest, ProviderError, Replica, SendMessageResponse,
};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Configuration for the Tavus provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TavusConfig {
    /// Base URL for the API (default: https://tavusapi.com/v2).
    pub base_url: String,
    /// Base URL of the embeddable conversation pages.
    pub embed_base_url: String,
}

impl Default for TavusConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TavusConfig {
    pub fn new() -> Self {
        Self {
            base_url: "https://tavusapi.com/v2".to_string(),
            embed_base_url: "https://tavusapi.com/conversations".to_string(),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the embed base URL.
    pub fn with_embed_base_url(mut self, url: impl Into<String>) -> Self {
        self.embed_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Tavus API client.
pub struct TavusProvider {
    config: TavusConfig,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn HttpTransport>,
}

#[derive(Deserialize)]
struct ReplicaList {
    #[serde(default)]
    replicas: Option<Vec<Replica>>,
}

impl TavusProvider {
    pub fn new(
        config: TavusConfig,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Attaches the credential, or fails if there is none.
    fn authorize(&self, request: HttpRequest) -> Result<HttpRequest, ProviderError> {
        let credential = self.credentials.current();
        if credential.is_empty() {
            return Err(ProviderError::Configuration);
        }
        Ok(request.with_auth(API_KEY_HEADER, credential.expose()))
    }

    async fn execute(&self, operation: &str, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
        let request = self.authorize(request)?;
        tracing::debug!(operation, url = %request.url, "sending provider request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!("Error during Tavus {}: {}", operation, e);
            ProviderError::from(e)
        })?;

        if !response.is_success() {
            let err = ProviderError::api(response.status, Self::error_message(&response.body));
            tracing::error!("Error during Tavus {}: {}", operation, err);
            return Err(err);
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: HttpRequest,
    ) -> Result<T, ProviderError> {
        let response = self.execute(operation, request).await?;
        serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::parse(format!("Failed to parse {} response: {}", operation, e)))
    }

    /// Extracts `message` from a JSON error body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }

    fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ProviderError> {
        serde_json::to_value(value).map_err(|e| ProviderError::parse(e.to_string()))
    }
}

#[async_trait]
impl ConversationProvider for TavusProvider {
    async fn create_persona(&self, request: PersonaRequest) -> Result<PersonaHandle, ProviderError> {
        let body = Self::to_body(&request)?;
        self.execute_json("create persona", HttpRequest::post(self.url("personas"), body))
            .await
    }

    async fn create_conversation(
        &self,
        request: ConversationRequest,
    ) -> Result<ConversationHandle, ProviderError> {
        tracing::info!(
            replica_id = %request.replica_id,
            conversation_name = %request.conversation_name,
            "creating Tavus conversation"
        );
        let body = Self::to_body(&request)?;
        let handle: ConversationHandle = self
            .execute_json(
                "create conversation",
                HttpRequest::post(self.url("conversations"), body),
            )
            .await?;
        tracing::info!(conversation_id = %handle.conversation_id, "Tavus conversation created");
        Ok(handle)
    }

    async fn list_replicas(&self) -> Result<Vec<Replica>, ProviderError> {
        let list: ReplicaList = self
            .execute_json("list replicas", HttpRequest::get(self.url("replicas")))
            .await?;
        Ok(list.replicas.unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<SendMessageResponse, ProviderError> {
        let url = self.url(&format!("conversations/{}/messages", conversation_id));
        self.execute_json(
            "send message",
            HttpRequest::post(url, json!({ "message_text": text })),
        )
        .await
    }

    async fn get_persona(&self, persona_id: &ProviderPersonaId) -> Result<PersonaDetails, ProviderError> {
        let url = self.url(&format!("personas/{}", persona_id));
        self.execute_json("get persona", HttpRequest::get(url)).await
    }

    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationDetails, ProviderError> {
        let url = self.url(&format!("conversations/{}", conversation_id));
        self.execute_json("get conversation", HttpRequest::get(url))
            .await
    }

    fn embed_url(&self, conversation_id: &ConversationId) -> String {
        format!("{}/{}", self.config.embed_base_url, conversation_id)
    }
}
