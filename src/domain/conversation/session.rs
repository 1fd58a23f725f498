//! Conversation session - one chat or call exchange, live or fallback.

use crate::domain::foundation::{ConversationId, StateMachine, ValidationError};

use super::{Message, SessionState};

/// One active exchange with the provider or the local fallback.
///
/// Messages are append-only and kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    state: SessionState,
    conversation_id: Option<ConversationId>,
    conversation_url: Option<String>,
    last_error: Option<String>,
    messages: Vec<Message>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True iff backed by a provider-created session.
    pub fn is_live(&self) -> bool {
        self.state.is_live() && self.conversation_id.is_some()
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn conversation_url(&self) -> Option<&str> {
        self.conversation_url.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message at the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Enters `Connecting`, clearing any previous error.
    pub fn begin_connecting(&mut self) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SessionState::Connecting)?;
        self.last_error = None;
        Ok(())
    }

    /// Enters `Live` with the provider's session handle.
    pub fn go_live(
        &mut self,
        conversation_id: ConversationId,
        conversation_url: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SessionState::Live)?;
        self.conversation_id = Some(conversation_id);
        self.conversation_url = Some(conversation_url.into());
        self.last_error = None;
        Ok(())
    }

    /// Enters `Fallback`, remembering why when there was a failure.
    pub fn fall_back(&mut self, error: Option<String>) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SessionState::Fallback)?;
        self.conversation_id = None;
        self.conversation_url = None;
        self.last_error = error;
        Ok(())
    }

    /// Enters `Error`. The provider session handle is dropped.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SessionState::Error)?;
        self.conversation_id = None;
        self.conversation_url = None;
        self.last_error = Some(error.into());
        Ok(())
    }
}
