//! VideoCallController - the persona video call screen.
//!
//! Starting a call asks the provider for a conversation. Success embeds the
//! provider's page; failure drops into the labelled demo mode where only
//! local mute/camera toggles exist. Either way the call is "in progress" and
//! its duration runs until `end_call`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

use crate::domain::call::{format_call_duration, CallMode, CallStatus};
use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::persona::PersonaDescriptor;
use crate::ports::{ConversationRequest, Notifier};

use super::integration::IntegrationFacade;

/// Shown when the key dialog is submitted empty.
pub const API_KEY_REQUIRED: &str = "Enter your Tavus API key to start a live video call.";

#[derive(Debug, Default)]
struct CallState {
    status: CallStatus,
    mode: Option<CallMode>,
    started_at: Option<Instant>,
}

pub struct VideoCallController {
    persona: PersonaDescriptor,
    facade: Arc<IntegrationFacade>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CallState>,
}

impl VideoCallController {
    pub fn new(
        persona: PersonaDescriptor,
        facade: Arc<IntegrationFacade>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            persona,
            facade,
            notifier,
            state: Mutex::new(CallState::default()),
        }
    }

    /// Idle → Connecting → InCall, embedded or demo.
    pub async fn start_call(&self) -> Result<CallMode, ValidationError> {
        {
            let mut state = self.state();
            state.status = state.status.transition_to(CallStatus::Connecting)?;
        }

        let request = ConversationRequest::new(
            self.persona.replica_id.clone(),
            format!("Video call with {}", self.persona.name),
        )
        .with_persona(self.persona.provider_persona_id.clone());

        let mode = match self.facade.create_conversation(request).await {
            Ok(handle) => {
                self.notifier
                    .success(&format!("Connected to {} via Tavus!", self.persona.name));
                CallMode::Embedded {
                    conversation_id: handle.conversation_id,
                    conversation_url: handle.conversation_url,
                }
            }
            Err(e) => {
                tracing::error!("Failed to start conversation: {}", e);
                self.notifier.error("Failed to start video call. Using demo mode.");
                CallMode::demo()
            }
        };

        let mut state = self.state();
        state.status = state.status.transition_to(CallStatus::InCall)?;
        state.mode = Some(mode.clone());
        state.started_at = Some(Instant::now());
        tracing::info!(persona = %self.persona.id, demo = mode.is_demo(), "call started");
        Ok(mode)
    }

    /// Saves a key and starts the call if none is running. Blank input
    /// changes nothing.
    pub async fn on_credential_saved(&self, value: &str) -> Option<CallMode> {
        if !self.facade.set_api_key(value).await {
            self.notifier.info(API_KEY_REQUIRED);
            return self.mode();
        }
        if self.status() != CallStatus::Idle {
            return self.mode();
        }
        self.start_call().await.ok()
    }

    /// Flips the demo-mode microphone. `None` outside demo mode.
    pub fn toggle_mute(&self) -> Option<bool> {
        match &mut self.state().mode {
            Some(CallMode::Demo { muted, .. }) => {
                *muted = !*muted;
                Some(*muted)
            }
            _ => None,
        }
    }

    /// Flips the demo-mode camera. `None` outside demo mode.
    pub fn toggle_camera(&self) -> Option<bool> {
        match &mut self.state().mode {
            Some(CallMode::Demo { camera_off, .. }) => {
                *camera_off = !*camera_off;
                Some(*camera_off)
            }
            _ => None,
        }
    }

    /// InCall → Idle. Clears mode and duration.
    pub fn end_call(&self) -> Result<(), ValidationError> {
        let mut state = self.state();
        state.status = state.status.transition_to(CallStatus::Idle)?;
        state.mode = None;
        state.started_at = None;
        tracing::info!(persona = %self.persona.id, "call ended");
        Ok(())
    }

    pub fn status(&self) -> CallStatus {
        self.state().status
    }

    pub fn mode(&self) -> Option<CallMode> {
        self.state().mode.clone()
    }

    pub fn duration_secs(&self) -> u64 {
        self.state()
            .started_at
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    /// Elapsed call time as `mm:ss`.
    pub fn formatted_duration(&self) -> String {
        format_call_duration(self.duration_secs())
    }

    fn state(&self) -> MutexGuard<'_, CallState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::RecordingNotifier;
    use crate::adapters::storage::InMemoryKeyValueStore;
    use crate::adapters::tavus::{MockCall, MockConversationProvider};
    use crate::application::CredentialStore;
    use crate::domain::foundation::PersonaId;
    use crate::domain::persona::find_persona;
    use crate::ports::ProviderError;
    use std::time::Duration;

    fn controller(provider: MockConversationProvider) -> (VideoCallController, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let credentials = Arc::new(CredentialStore::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(notifier.clone()),
        ));
        let facade = Arc::new(IntegrationFacade::new(
            Arc::new(provider),
            credentials,
            Arc::new(notifier.clone()),
        ));
        let persona = find_persona(&PersonaId::new("history-teacher")).unwrap().clone();
        (
            VideoCallController::new(persona, facade, Arc::new(notifier.clone())),
            notifier,
        )
    }

    #[tokio::test]
    async fn successful_start_embeds_provider_page() {
        let provider = MockConversationProvider::new();
        let (call, _) = controller(provider.clone());

        let mode = call.start_call().await.unwrap();

        assert!(matches!(mode, CallMode::Embedded { .. }));
        assert_eq!(call.status(), CallStatus::InCall);
        let MockCall::CreateConversation(request) = &provider.get_calls()[0] else {
            panic!("expected conversation request");
        };
        assert!(request.conversation_name.starts_with("Video call with "));
        assert!(call.toggle_mute().is_none());
    }

    #[tokio::test]
    async fn failed_start_enters_demo_mode() {
        let (call, notifier) = controller(
            MockConversationProvider::new().failing_conversations(ProviderError::api(402, "quota")),
        );

        let mode = call.start_call().await.unwrap();

        assert!(mode.is_demo());
        assert_eq!(call.status(), CallStatus::InCall);
        assert!(notifier.contains("Failed to start video call. Using demo mode."));
        assert_eq!(call.toggle_mute(), Some(true));
        assert_eq!(call.toggle_camera(), Some(true));
        assert_eq!(call.toggle_mute(), Some(false));
    }

    #[tokio::test]
    async fn cannot_start_twice() {
        let (call, _) = controller(MockConversationProvider::new());
        call.start_call().await.unwrap();

        assert!(call.start_call().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn duration_runs_until_end() {
        let (call, _) = controller(MockConversationProvider::new());
        call.start_call().await.unwrap();

        tokio::time::advance(Duration::from_secs(75)).await;
        assert_eq!(call.formatted_duration(), "01:15");

        call.end_call().unwrap();
        assert_eq!(call.status(), CallStatus::Idle);
        assert_eq!(call.formatted_duration(), "00:00");
        assert!(call.mode().is_none());
    }

    #[tokio::test]
    async fn credential_saved_starts_idle_call() {
        let (call, _) = controller(MockConversationProvider::new());

        let mode = call.on_credential_saved("k").await;

        assert!(mode.is_some());
        assert_eq!(call.status(), CallStatus::InCall);
    }

    #[tokio::test]
    async fn blank_credential_does_not_start_call() {
        let provider = MockConversationProvider::new();
        let (call, notifier) = controller(provider.clone());

        let mode = call.on_credential_saved("  ").await;

        assert!(mode.is_none());
        assert_eq!(call.status(), CallStatus::Idle);
        assert_eq!(provider.call_count(), 0);
        assert!(notifier.contains(API_KEY_REQUIRED));
        assert!(!notifier.contains("Tavus API key configured!"));
    }
}
