//! Mock Conversation Provider for testing.
//!
//! Provides a configurable mock implementation of the ConversationProvider
//! port, allowing tests to run without calling the real provider.
//!
//! # Features
//!
//! - Switchable success/failure per operation (mid-test, for retry flows)
//! - Simulated latency on sends for ordering tests
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockConversationProvider::new()
//!     .failing_conversations(ProviderError::api(500, "down"));
//!
//! // ... later, let the retry succeed
//! provider.succeed_conversations();
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{ConversationId, ProviderPersonaId};
use crate::ports::{
    ConversationDetails, ConversationHandle, ConversationProvider, ConversationRequest,
    PersonaDetails, PersonaHandle, PersonaRequest, ProviderError, Replica, SendMessageResponse,
};

/// A recorded call against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreatePersona(PersonaRequest),
    CreateConversation(ConversationRequest),
    ListReplicas,
    SendMessage { conversation_id: ConversationId, text: String },
    GetPersona(ProviderPersonaId),
    GetConversation(ConversationId),
}

#[derive(Debug, Default)]
struct Behavior {
    conversation_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    replies: Option<Vec<Option<String>>>,
    replicas: Vec<Replica>,
    replicas_error: Option<ProviderError>,
    send_delay: Duration,
}

/// Mock provider for testing.
#[derive(Debug, Clone, Default)]
pub struct MockConversationProvider {
    behavior: Arc<Mutex<Behavior>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    conversations_created: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockConversationProvider {
    /// Creates a mock where every operation succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create_conversation` fail with `error`.
    pub fn failing_conversations(self, error: ProviderError) -> Self {
        lock(&self.behavior).conversation_error = Some(error);
        self
    }

    /// Makes `send_message` fail with `error`.
    pub fn failing_sends(self, error: ProviderError) -> Self {
        lock(&self.behavior).send_error = Some(error);
        self
    }

    /// Replies to sends with these messages in order, then with the last one.
    /// `None` models a provider response without a `message` field.
    pub fn with_replies(self, replies: Vec<Option<String>>) -> Self {
        lock(&self.behavior).replies = Some(replies);
        self
    }

    /// Sets the replica list.
    pub fn with_replicas(self, replicas: Vec<Replica>) -> Self {
        lock(&self.behavior).replicas = replicas;
        self
    }

    /// Makes `list_replicas` (and credential validation) fail.
    pub fn failing_replicas(self, error: ProviderError) -> Self {
        lock(&self.behavior).replicas_error = Some(error);
        self
    }

    /// Sets simulated latency per send.
    pub fn with_send_delay(self, delay: Duration) -> Self {
        lock(&self.behavior).send_delay = delay;
        self
    }

    /// From now on, `create_conversation` succeeds.
    pub fn succeed_conversations(&self) {
        lock(&self.behavior).conversation_error = None;
    }

    /// From now on, `send_message` succeeds.
    pub fn succeed_sends(&self) {
        lock(&self.behavior).send_error = None;
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns the number of `send_message` calls.
    pub fn send_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, MockCall::SendMessage { .. }))
            .count()
    }

    /// Returns the number of `create_conversation` calls.
    pub fn conversation_attempts(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, MockCall::CreateConversation(_)))
            .count()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl ConversationProvider for MockConversationProvider {
    async fn create_persona(&self, request: PersonaRequest) -> Result<PersonaHandle, ProviderError> {
        let name = request.persona_name.clone();
        self.record(MockCall::CreatePersona(request));
        Ok(PersonaHandle {
            persona_id: ProviderPersonaId::new("mock-persona"),
            persona_name: name,
            status: "active".to_string(),
            created_at: String::new(),
        })
    }

    async fn create_conversation(
        &self,
        request: ConversationRequest,
    ) -> Result<ConversationHandle, ProviderError> {
        self.record(MockCall::CreateConversation(request));
        if let Some(err) = lock(&self.behavior).conversation_error.clone() {
            return Err(err);
        }
        let n = self.conversations_created.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("mock-conversation-{}", n);
        Ok(ConversationHandle {
            conversation_url: format!("https://mock.tavus.io/{}", id),
            conversation_id: ConversationId::new(id),
            status: "active".to_string(),
            created_at: String::new(),
        })
    }

    async fn list_replicas(&self) -> Result<Vec<Replica>, ProviderError> {
        self.record(MockCall::ListReplicas);
        let behavior = lock(&self.behavior);
        match &behavior.replicas_error {
            Some(err) => Err(err.clone()),
            None => Ok(behavior.replicas.clone()),
        }
    }

    async fn send_message(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Result<SendMessageResponse, ProviderError> {
        let sent_before = self.send_count();
        self.record(MockCall::SendMessage {
            conversation_id: conversation_id.clone(),
            text: text.to_string(),
        });

        let (delay, outcome) = {
            let behavior = lock(&self.behavior);
            let outcome = match &behavior.send_error {
                Some(err) => Err(err.clone()),
                None => {
                    let message = match &behavior.replies {
                        Some(replies) if !replies.is_empty() => {
                            replies[sent_before.min(replies.len() - 1)].clone()
                        }
                        _ => Some(format!("Live reply to: {}", text)),
                    };
                    Ok(SendMessageResponse {
                        message,
                        ..Default::default()
                    })
                }
            };
            (behavior.send_delay, outcome)
        };

        if !delay.is_zero() {
            sleep(delay).await;
        }
        outcome
    }

    async fn get_persona(&self, persona_id: &ProviderPersonaId) -> Result<PersonaDetails, ProviderError> {
        self.record(MockCall::GetPersona(persona_id.clone()));
        Ok(PersonaDetails {
            persona_id: persona_id.clone(),
            persona_name: None,
            status: Some("active".to_string()),
            extra: Default::default(),
        })
    }

    async fn get_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationDetails, ProviderError> {
        self.record(MockCall::GetConversation(conversation_id.clone()));
        Ok(ConversationDetails {
            conversation_id: conversation_id.clone(),
            conversation_url: Some(self.embed_url(conversation_id)),
            status: Some("active".to_string()),
            extra: Default::default(),
        })
    }

    fn embed_url(&self, conversation_id: &ConversationId) -> String {
        format!("https://mock.tavus.io/{}", conversation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ReplicaId;

    #[tokio::test]
    async fn conversation_outcome_can_be_switched() {
        let provider =
            MockConversationProvider::new().failing_conversations(ProviderError::api(500, "down"));
        let request = ConversationRequest::new(ReplicaId::new("r"), "n");

        assert!(provider.create_conversation(request.clone()).await.is_err());
        provider.succeed_conversations();
        let handle = provider.create_conversation(request).await.unwrap();

        assert_eq!(handle.conversation_id.as_str(), "mock-conversation-1");
        assert_eq!(provider.conversation_attempts(), 2);
    }

    #[tokio::test]
    async fn scripted_replies_are_used_in_order() {
        let provider = MockConversationProvider::new()
            .with_replies(vec![Some("one".into()), None]);
        let id = ConversationId::new("c");

        let first = provider.send_message(&id, "a").await.unwrap();
        let second = provider.send_message(&id, "b").await.unwrap();
        let third = provider.send_message(&id, "c").await.unwrap();

        assert_eq!(first.message.as_deref(), Some("one"));
        assert!(second.message.is_none());
        assert!(third.message.is_none());
        assert_eq!(provider.send_count(), 3);
    }
}
