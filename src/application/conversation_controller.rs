//! ConversationSessionController - lifecycle of one chat with one persona.
//!
//! ```text
//! Uninitialized ──► Connecting ──► Live ──► Error
//!       │               │                    │
//!       └──────────► Fallback ◄──────────────┘ (via retry → Connecting)
//! ```
//!
//! Provider failures never surface as errors to the caller: the session
//! degrades to canned in-character replies and tells the user so.
//!
//! Replies are produced on spawned tasks after an artificial delay. Every
//! task checks the controller is still alive before touching the session,
//! so dropping the controller mid-reply is safe.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::conversation::{ConversationSession, Message, ResponseDelay, SessionState};
use crate::domain::foundation::ConversationId;
use crate::domain::persona::{FallbackResponder, PersonaDescriptor, VoiceProfile};
use crate::ports::{ConversationRequest, Notifier, ProviderError};

use super::integration::IntegrationFacade;

/// Shown instead of a live connection when no credential is available.
pub const CONFIGURE_KEY_PROMPT: &str =
    "Add your Tavus API key to chat live. Using offline replies for now.";

/// Tunables for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub response_delay: ResponseDelay,
    pub conversation_name_prefix: String,
    pub callback_url: Option<String>,
    /// Seeds reply selection and delay jitter. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            response_delay: ResponseDelay::default(),
            conversation_name_prefix: "Echo Demo".to_string(),
            callback_url: None,
            seed: None,
        }
    }
}

impl SessionSettings {
    pub fn with_delay(mut self, delay: ResponseDelay) -> Self {
        self.response_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}

/// Handle to a reply that has not been appended yet.
#[derive(Debug)]
pub struct PendingReply(JoinHandle<()>);

impl PendingReply {
    /// Waits until the reply was appended (or discarded after teardown).
    pub async fn wait(self) {
        if let Err(e) = self.0.await {
            tracing::warn!("Reply task failed: {}", e);
        }
    }
}

struct Inner {
    persona: PersonaDescriptor,
    responder: FallbackResponder,
    facade: Arc<IntegrationFacade>,
    notifier: Arc<dyn Notifier>,
    settings: SessionSettings,
    session: Mutex<ConversationSession>,
    rng: Mutex<StdRng>,
    alive: AtomicBool,
    pending: AtomicUsize,
}

/// Owns one `ConversationSession`. Not shared across screens.
pub struct ConversationSessionController {
    inner: Arc<Inner>,
}

impl ConversationSessionController {
    pub fn new(
        persona: PersonaDescriptor,
        facade: Arc<IntegrationFacade>,
        notifier: Arc<dyn Notifier>,
        settings: SessionSettings,
    ) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            inner: Arc::new(Inner {
                responder: FallbackResponder::new(persona.variant()),
                persona,
                facade,
                notifier,
                settings,
                session: Mutex::new(ConversationSession::new()),
                rng: Mutex::new(rng),
                alive: AtomicBool::new(true),
                pending: AtomicUsize::new(0),
            }),
        }
    }

    /// Greets the user and tries to go live. Only the first call has an effect.
    pub async fn mount(&self) -> SessionState {
        let inner = &self.inner;
        {
            let mut session = inner.session();
            if session.state() != SessionState::Uninitialized || !session.messages().is_empty() {
                return session.state();
            }
            session.push(Message::persona(inner.voice().greeting));
        }

        if !inner.facade.is_configured() {
            tracing::info!(persona = %inner.persona.id, "no credential, starting in fallback");
            if let Err(e) = inner.session().fall_back(None) {
                tracing::warn!("Unexpected session transition: {}", e);
            }
            inner.notifier.info(CONFIGURE_KEY_PROMPT);
            return self.state();
        }

        inner.connect().await
    }

    /// Appends the user's message and schedules the persona's reply.
    ///
    /// Blank input is ignored. Must be called within a tokio runtime.
    pub fn send_message(&self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.inner.session().push(Message::user(text));
        self.inner.pending.fetch_add(1, Ordering::SeqCst);

        let inner = self.inner.clone();
        let text = text.to_string();
        Some(PendingReply(tokio::spawn(async move {
            inner.reply_to(text).await;
        })))
    }

    /// Re-attempts going live from `Fallback` or `Error`. A no-op elsewhere.
    pub async fn retry(&self) -> SessionState {
        let inner = &self.inner;
        let state = self.state();
        if !state.can_retry() {
            tracing::debug!(?state, "retry ignored");
            return state;
        }

        if !inner.facade.is_configured() {
            if state == SessionState::Fallback {
                if let Err(e) = inner.session().fail(ProviderError::Configuration.to_string()) {
                    tracing::warn!("Unexpected session transition: {}", e);
                }
            }
            inner.notifier.info(CONFIGURE_KEY_PROMPT);
            return self.state();
        }

        inner.connect().await
    }

    /// Saves a new credential and reconnects with it. Blank input only
    /// repeats the configure prompt.
    pub async fn on_credential_saved(&self, value: &str) -> SessionState {
        if !self.inner.facade.set_api_key(value).await {
            self.inner.notifier.info(CONFIGURE_KEY_PROMPT);
            return self.state();
        }
        match self.state() {
            SessionState::Uninitialized => self.mount().await,
            _ => self.retry().await,
        }
    }

    /// Stops all further session updates. Also happens on drop.
    pub fn unmount(&self) {
        if self.inner.alive.swap(false, Ordering::SeqCst) {
            tracing::debug!(persona = %self.inner.persona.id, "conversation unmounted");
        }
    }

    pub fn persona(&self) -> &PersonaDescriptor {
        &self.inner.persona
    }

    pub fn state(&self) -> SessionState {
        self.inner.session().state()
    }

    pub fn is_live(&self) -> bool {
        self.inner.session().is_live()
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.inner.session().conversation_id().cloned()
    }

    pub fn conversation_url(&self) -> Option<String> {
        self.inner.session().conversation_url().map(str::to_string)
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.session().last_error().map(str::to_string)
    }

    /// Snapshot of the transcript in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.session().messages().to_vec()
    }

    /// Number of replies still being composed.
    pub fn pending_replies(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// True while at least one reply is pending.
    pub fn is_typing(&self) -> bool {
        self.pending_replies() > 0
    }
}

impl Drop for ConversationSessionController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, ConversationSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn voice(&self) -> &'static VoiceProfile {
        self.responder.variant().profile()
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn canned_reply(&self, text: &str) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.responder.respond(text, &mut *rng).to_string()
    }

    fn sample_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.settings.response_delay.sample(&mut *rng)
    }

    fn conversation_request(&self) -> ConversationRequest {
        let name = format!(
            "{} - {}",
            self.settings.conversation_name_prefix, self.persona.name
        );
        let request = ConversationRequest::new(self.persona.replica_id.clone(), name)
            .with_persona(self.persona.provider_persona_id.clone());
        match &self.settings.callback_url {
            Some(url) => request.with_callback_url(url.clone()),
            None => request,
        }
    }

    /// Connecting → Live or Fallback.
    async fn connect(&self) -> SessionState {
        let began = self.session().begin_connecting();
        if let Err(e) = began {
            tracing::debug!("Connect skipped: {}", e);
            return self.session().state();
        }
        tracing::info!(persona = %self.persona.id, "connecting to provider");

        let result = self.facade.create_conversation(self.conversation_request()).await;

        if !self.is_alive() {
            tracing::debug!("conversation created after unmount, discarding");
            return self.session().state();
        }

        let mut session = self.session();
        let transition = match result {
            Ok(handle) => {
                let transition = session.go_live(handle.conversation_id, handle.conversation_url);
                if transition.is_ok() {
                    tracing::info!(persona = %self.persona.id, "session live");
                    self.notifier
                        .success(&format!("Connected to {} via Tavus!", self.persona.name));
                }
                transition
            }
            Err(e) => {
                tracing::error!("Failed to initialize conversation: {}", e);
                let transition = session.fall_back(Some(e.to_string()));
                if transition.is_ok() {
                    self.notifier.error(self.voice().connection_failure_notice);
                }
                transition
            }
        };
        if let Err(e) = transition {
            tracing::warn!("Unexpected session transition: {}", e);
        }
        session.state()
    }

    async fn reply_to(self: Arc<Self>, text: String) {
        let reply = self.compose_reply(&text).await;
        let delay = self.sample_delay();
        tokio::time::sleep(delay).await;

        if self.is_alive() {
            self.session().push(Message::persona(reply));
        } else {
            tracing::debug!("reply arrived after unmount, discarding");
        }
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    async fn compose_reply(&self, text: &str) -> String {
        let live = {
            let session = self.session();
            if session.is_live() {
                session.conversation_id().cloned()
            } else {
                None
            }
        };

        let Some(conversation_id) = live else {
            return self.canned_reply(text);
        };

        match self.facade.send_message(&conversation_id, text).await {
            Ok(response) => match response.message {
                Some(message) if !message.trim().is_empty() => message,
                _ => {
                    tracing::debug!("live reply had no message, using canned reply");
                    self.canned_reply(text)
                }
            },
            Err(e) => {
                tracing::warn!("Tavus API error, falling back to canned replies: {}", e);
                if self.is_alive() {
                    self.degrade(&conversation_id, e);
                }
                self.canned_reply(text)
            }
        }
    }

    /// Live → Error, once per live session.
    fn degrade(&self, conversation_id: &ConversationId, error: ProviderError) {
        let mut session = self.session();
        if session.conversation_id() != Some(conversation_id) {
            return;
        }
        match session.fail(error.to_string()) {
            Ok(()) => self.notifier.error(self.voice().degraded_notice),
            Err(e) => tracing::warn!("Unexpected session transition: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::RecordingNotifier;
    use crate::adapters::storage::InMemoryKeyValueStore;
    use crate::adapters::tavus::{MockCall, MockConversationProvider};
    use crate::application::CredentialStore;
    use crate::domain::conversation::Sender;
    use crate::domain::credential::Credential;
    use crate::domain::foundation::PersonaId;
    use crate::domain::persona::{find_persona, PersonaVariant};

    struct Harness {
        controller: ConversationSessionController,
        provider: MockConversationProvider,
        notifier: RecordingNotifier,
    }

    fn harness_with(provider: MockConversationProvider, default: Credential, persona: &str) -> Harness {
        let notifier = RecordingNotifier::new();
        let credentials = Arc::new(
            CredentialStore::new(
                Arc::new(InMemoryKeyValueStore::new()),
                Arc::new(notifier.clone()),
            )
            .with_default(default),
        );
        let facade = Arc::new(IntegrationFacade::new(
            Arc::new(provider.clone()),
            credentials,
            Arc::new(notifier.clone()),
        ));
        let persona = find_persona(&PersonaId::new(persona)).unwrap().clone();
        let controller = ConversationSessionController::new(
            persona,
            facade,
            Arc::new(notifier.clone()),
            SessionSettings::default().with_seed(7),
        );
        Harness {
            controller,
            provider,
            notifier,
        }
    }

    fn santa() -> &'static VoiceProfile {
        PersonaVariant::SantaClaus.profile()
    }

    fn harness(provider: MockConversationProvider) -> Harness {
        harness_with(provider, Credential::builtin(), "santa-claus")
    }

    #[tokio::test(start_paused = true)]
    async fn mount_greets_and_goes_live() {
        let h = harness(MockConversationProvider::new());

        let state = h.controller.mount().await;

        assert_eq!(state, SessionState::Live);
        assert!(h.controller.is_live());
        let messages = h.controller.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender(), Sender::Persona);
        assert!(h.notifier.contains("Connected to Santa Claus - Holiday Helper via Tavus!"));
    }

    #[tokio::test(start_paused = true)]
    async fn conversation_request_is_named_after_persona() {
        let h = harness(MockConversationProvider::new());
        h.controller.mount().await;

        let calls = h.provider.get_calls();
        let MockCall::CreateConversation(request) = &calls[0] else {
            panic!("expected a conversation request, got {:?}", calls[0]);
        };
        assert_eq!(request.conversation_name, "Echo Demo - Santa Claus - Holiday Helper");
        assert_eq!(request.replica_id.as_str(), "r3fbe3834a3e");
        assert_eq!(request.persona_id.as_ref().unwrap().as_str(), "p3bb4745d4f9");
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_falls_back_with_in_character_notice() {
        let h = harness(
            MockConversationProvider::new().failing_conversations(ProviderError::api(500, "down")),
        );

        assert_eq!(h.controller.mount().await, SessionState::Fallback);
        assert_eq!(
            h.controller.last_error().as_deref(),
            Some("Tavus API error: 500 - down")
        );
        assert!(h
            .notifier
            .contains(santa().connection_failure_notice));

        h.controller.send_message("hello").unwrap().wait().await;
        let reply = h.controller.messages().last().unwrap().content().to_string();
        assert!(h.controller.persona().variant().profile().responses.contains(&reply.as_str()));
        assert_eq!(h.provider.send_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_messages_are_ignored() {
        let h = harness(MockConversationProvider::new());
        h.controller.mount().await;

        assert!(h.controller.send_message("   ").is_none());
        assert_eq!(h.controller.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn live_send_uses_provider_reply() {
        let h = harness(MockConversationProvider::new().with_replies(vec![Some("Ho ho!".into())]));
        h.controller.mount().await;

        h.controller.send_message("hi santa").unwrap().wait().await;

        let messages = h.controller.messages();
        assert_eq!(messages[1].content(), "hi santa");
        assert_eq!(messages[2].content(), "Ho ho!");
        assert_eq!(h.provider.send_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn live_reply_without_message_is_substituted() {
        let h = harness(MockConversationProvider::new().with_replies(vec![None]));
        h.controller.mount().await;

        h.controller.send_message("hi").unwrap().wait().await;

        let reply = h.controller.messages()[2].content().to_string();
        assert!(santa().responses.contains(&reply.as_str()));
        assert_eq!(h.controller.state(), SessionState::Live);
    }

    #[tokio::test(start_paused = true)]
    async fn live_send_failure_degrades_to_error_state() {
        let h = harness(
            MockConversationProvider::new().failing_sends(ProviderError::network("reset")),
        );
        h.controller.mount().await;

        h.controller.send_message("hi").unwrap().wait().await;

        assert_eq!(h.controller.state(), SessionState::Error);
        assert_eq!(h.controller.messages().len(), 3);
        assert!(h.notifier.contains(santa().degraded_notice));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_degrade_resumes_live_replies() {
        let h = harness(
            MockConversationProvider::new().failing_sends(ProviderError::network("reset")),
        );
        h.controller.mount().await;
        h.controller.send_message("hi").unwrap().wait().await;
        assert_eq!(h.controller.state(), SessionState::Error);

        h.provider.succeed_sends();
        assert_eq!(h.controller.retry().await, SessionState::Live);
        h.controller.send_message("again").unwrap().wait().await;

        assert_eq!(h.controller.state(), SessionState::Live);
        assert_eq!(h.controller.messages().last().unwrap().content(), "Live reply to: again");
        assert_eq!(h.provider.send_count(), 2);
        assert_eq!(h.provider.conversation_attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_from_fallback_goes_live_and_routes_sends_live() {
        let h = harness(
            MockConversationProvider::new().failing_conversations(ProviderError::api(503, "busy")),
        );
        h.controller.mount().await;
        h.provider.succeed_conversations();

        assert_eq!(h.controller.retry().await, SessionState::Live);
        h.controller.send_message("now live?").unwrap().wait().await;

        assert_eq!(h.provider.send_count(), 1);
        assert!(h.controller.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_is_a_noop_when_live() {
        let h = harness(MockConversationProvider::new());
        h.controller.mount().await;

        assert_eq!(h.controller.retry().await, SessionState::Live);
        assert_eq!(h.provider.conversation_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_credential_starts_in_fallback_without_provider_calls() {
        let h = harness_with(MockConversationProvider::new(), Credential::empty(), "tech-mentor");

        assert_eq!(h.controller.mount().await, SessionState::Fallback);
        assert!(h.notifier.contains(CONFIGURE_KEY_PROMPT));
        assert_eq!(h.provider.call_count(), 0);

        assert_eq!(h.controller.retry().await, SessionState::Error);
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn saving_credential_reconnects() {
        let h = harness_with(MockConversationProvider::new(), Credential::empty(), "tech-mentor");
        h.controller.mount().await;

        let state = h.controller.on_credential_saved("fresh-key").await;

        assert_eq!(state, SessionState::Live);
        assert_eq!(h.provider.conversation_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_credential_save_keeps_live_session() {
        let h = harness(MockConversationProvider::new());
        h.controller.on_credential_saved("good-user-key").await;
        assert_eq!(h.controller.state(), SessionState::Live);
        h.notifier.drain();

        let state = h.controller.on_credential_saved("").await;

        assert_eq!(state, SessionState::Live);
        let credentials = h.controller.inner.facade.credentials();
        assert_eq!(credentials.get().expose(), "good-user-key");
        assert!(credentials.is_configured());
        assert!(!h.notifier.contains("Tavus API key configured!"));
        assert!(h.notifier.contains(CONFIGURE_KEY_PROMPT));
        assert_eq!(h.provider.conversation_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn replies_after_unmount_are_discarded() {
        let h = harness(
            MockConversationProvider::new().failing_conversations(ProviderError::api(500, "x")),
        );
        h.controller.mount().await;

        let pending = h.controller.send_message("hello").unwrap();
        assert!(h.controller.is_typing());
        h.controller.unmount();
        pending.wait().await;

        assert_eq!(h.controller.messages().len(), 2);
        assert_eq!(h.controller.pending_replies(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mount_twice_greets_once() {
        let h = harness(MockConversationProvider::new());
        h.controller.mount().await;
        h.controller.mount().await;

        assert_eq!(h.controller.messages().len(), 1);
        assert_eq!(h.provider.conversation_attempts(), 1);
    }
}
