//! IntegrationFacade - UI-facing wrapper around the conversation provider.
//!
//! Every operation:
//! 1. raises the busy indicator for its duration (success or failure)
//! 2. clears `last_error` on entry and records it on failure
//! 3. toasts according to the operation (see below)
//!
//! Conversation creation and message sends do not toast on failure; the
//! session controller owns those messages and words them in character.
//! Nothing here retries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{ConversationId, ProviderPersonaId};
use crate::ports::{
    ConversationDetails, ConversationHandle, ConversationProvider, ConversationRequest,
    Notifier, PersonaDetails, PersonaHandle, PersonaRequest, ProviderError, Replica,
    SendMessageResponse,
};

use super::credential_store::CredentialStore;

/// Lowers the busy indicator when dropped.
struct BusyGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    fn raise(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Whether a failure is toasted here or left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    Toast,
    Silent,
}

/// Provider operations plus busy/error bookkeeping and notifications.
pub struct IntegrationFacade {
    provider: Arc<dyn ConversationProvider>,
    credentials: Arc<CredentialStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl IntegrationFacade {
    pub fn new(
        provider: Arc<dyn ConversationProvider>,
        credentials: Arc<CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            credentials,
            notifier,
            in_flight: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    /// True while any operation is in flight. A UI indicator, not a lock.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failure, cleared when the next call starts.
    pub fn last_error(&self) -> Option<String> {
        self.error_slot().clone()
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn embed_url(&self, conversation_id: &ConversationId) -> String {
        self.provider.embed_url(conversation_id)
    }

    pub async fn create_persona(&self, request: PersonaRequest) -> Result<PersonaHandle, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.create_persona(request).await;
        if result.is_ok() {
            self.notifier.success("Persona created successfully!");
        }
        self.finish(result, OnFailure::Toast)
    }

    pub async fn create_conversation(
        &self,
        request: ConversationRequest,
    ) -> Result<ConversationHandle, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.create_conversation(request).await;
        self.finish(result, OnFailure::Silent)
    }

    pub async fn send_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<SendMessageResponse, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.send_message(conversation_id, text).await;
        self.finish(result, OnFailure::Silent)
    }

    pub async fn list_replicas(&self) -> Result<Vec<Replica>, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.list_replicas().await;
        self.finish(result, OnFailure::Toast)
    }

    pub async fn get_persona(&self, persona_id: &ProviderPersonaId) -> Result<PersonaDetails, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.get_persona(persona_id).await;
        self.finish(result, OnFailure::Toast)
    }

    pub async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationDetails, ProviderError> {
        let _busy = self.begin();
        let result = self.provider.get_conversation(conversation_id).await;
        self.finish(result, OnFailure::Toast)
    }

    /// Saves a user-supplied key. The store confirms with a toast.
    /// Returns false, changing nothing, for blank input.
    pub async fn set_api_key(&self, value: &str) -> bool {
        self.credentials.set(value).await
    }

    /// Reverts to the default key.
    pub async fn clear_api_key(&self) {
        self.credentials.clear().await;
    }

    /// Checks the active key against the provider. Never fails.
    pub async fn validate_credential(&self) -> bool {
        let _busy = self.begin();
        let valid = self.provider.validate_credential().await;
        if valid {
            self.notifier.success("Tavus API connection successful!");
        } else {
            let message = "Invalid Tavus API key";
            *self.error_slot() = Some(message.to_string());
            self.notifier.error(message);
        }
        valid
    }

    fn begin(&self) -> BusyGuard<'_> {
        *self.error_slot() = None;
        BusyGuard::raise(&self.in_flight)
    }

    fn finish<T>(&self, result: Result<T, ProviderError>, on_failure: OnFailure) -> Result<T, ProviderError> {
        if let Err(e) = &result {
            let message = e.to_string();
            *self.error_slot() = Some(message.clone());
            if on_failure == OnFailure::Toast {
                self.notifier.error(&message);
            }
        }
        result
    }

    fn error_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
