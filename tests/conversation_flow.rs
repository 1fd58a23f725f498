//! Integration tests for conversation sessions over the full provider stack.
//!
//! Every test wires the real `TavusProvider` to a scripted `MockTransport`,
//! so the assertions cover what actually goes over the wire (URLs, headers,
//! bodies) as well as the session state the user sees.

use proptest::prelude::*;
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;

use echo::adapters::{
    FileKeyValueStore, InMemoryKeyValueStore, MockTransport, RecordingNotifier, TavusConfig,
    TavusProvider,
};
use echo::application::{
    ConversationSessionController, CredentialStore, IntegrationFacade, SessionSettings,
    CONFIGURE_KEY_PROMPT,
};
use echo::domain::conversation::{ResponseDelay, Sender, SessionState};
use echo::domain::credential::{Credential, DEFAULT_CREDENTIAL};
use echo::domain::foundation::PersonaId;
use echo::domain::persona::{find_persona, PersonaVariant};
use echo::ports::{
    ConversationProvider, HttpMethod, KeyValueStore, ProviderError, StaticCredential,
    TransportError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Stack {
    controller: ConversationSessionController,
    facade: Arc<IntegrationFacade>,
    transport: MockTransport,
    notifier: RecordingNotifier,
}

fn stack_with(transport: MockTransport, default: Credential, persona: &str, seed: u64) -> Stack {
    let notifier = RecordingNotifier::new();
    let credentials = Arc::new(
        CredentialStore::new(Arc::new(InMemoryKeyValueStore::new()), Arc::new(notifier.clone()))
            .with_default(default),
    );
    let provider = Arc::new(TavusProvider::new(
        TavusConfig::new(),
        credentials.clone(),
        Arc::new(transport.clone()),
    ));
    let facade = Arc::new(IntegrationFacade::new(
        provider,
        credentials,
        Arc::new(notifier.clone()),
    ));
    let persona = find_persona(&PersonaId::new(persona))
        .expect("catalog persona")
        .clone();
    let controller = ConversationSessionController::new(
        persona,
        facade.clone(),
        Arc::new(notifier.clone()),
        SessionSettings::default().with_seed(seed),
    );

    Stack {
        controller,
        facade,
        transport,
        notifier,
    }
}

fn stack(transport: MockTransport) -> Stack {
    stack_with(transport, Credential::builtin(), "santa-claus", 42)
}

fn conversation_created(id: &str) -> serde_json::Value {
    json!({
        "conversation_id": id,
        "conversation_url": format!("https://tavus.daily.co/{}", id),
        "status": "active",
        "created_at": "2024-12-01T10:00:00Z"
    })
}

fn santa_pool() -> &'static [&'static str] {
    PersonaVariant::SantaClaus.profile().responses
}

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn credential_defaults_to_builtin_key_when_nothing_is_saved() {
    let credentials = CredentialStore::new(
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(RecordingNotifier::new()),
    );
    credentials.load().await;

    assert_eq!(credentials.get().expose(), DEFAULT_CREDENTIAL);
    assert!(credentials.is_configured());
    assert!(!credentials.is_user_provided());
}

#[tokio::test]
async fn saved_credential_survives_restart_and_reaches_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("echo-storage.yaml");

    {
        let credentials = CredentialStore::new(
            Arc::new(FileKeyValueStore::new(&path)),
            Arc::new(RecordingNotifier::new()),
        );
        credentials.set("  user-key-123  ").await;
    }

    let credentials = Arc::new(CredentialStore::new(
        Arc::new(FileKeyValueStore::new(&path)),
        Arc::new(RecordingNotifier::new()),
    ));
    credentials.load().await;
    assert_eq!(credentials.get().expose(), "user-key-123");

    let transport = MockTransport::new().with_json(200, json!({ "replicas": [] }));
    let provider = TavusProvider::new(
        TavusConfig::new(),
        credentials,
        Arc::new(transport.clone()),
    );
    provider.list_replicas().await.unwrap();

    let calls = transport.get_calls();
    let auth = calls[0].auth.as_ref().expect("auth header");
    assert_eq!(auth.name, "x-api-key");
    assert_eq!(auth.value.expose_secret(), "user-key-123");
}

#[tokio::test]
async fn clearing_credential_restores_default_and_forgets_saved_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("echo-storage.yaml");
    let store = Arc::new(FileKeyValueStore::new(&path));
    let credentials = CredentialStore::new(store.clone(), Arc::new(RecordingNotifier::new()));

    credentials.set("user-key").await;
    credentials.clear().await;

    assert_eq!(credentials.get().expose(), DEFAULT_CREDENTIAL);
    assert_eq!(store.get("tavus-api-key").await.unwrap(), None);
}

#[tokio::test]
async fn empty_credential_fails_before_any_request() {
    let transport = MockTransport::new().with_json(200, json!({ "replicas": [] }));
    let provider = TavusProvider::new(
        TavusConfig::new(),
        Arc::new(StaticCredential::new(Credential::empty())),
        Arc::new(transport.clone()),
    );

    let err = provider.list_replicas().await.unwrap_err();

    assert_eq!(err, ProviderError::Configuration);
    assert_eq!(transport.call_count(), 0);
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn mount_goes_live_with_named_conversation() {
    let s = stack(MockTransport::new().with_json(200, conversation_created("c123")));

    let state = s.controller.mount().await;

    assert_eq!(state, SessionState::Live);
    assert_eq!(s.controller.conversation_id().unwrap().as_str(), "c123");
    assert_eq!(
        s.facade.embed_url(&s.controller.conversation_id().unwrap()),
        "https://tavusapi.com/conversations/c123"
    );

    let calls = s.transport.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, HttpMethod::Post);
    assert_eq!(calls[0].url, "https://tavusapi.com/v2/conversations");
    let body = calls[0].body.as_ref().unwrap();
    assert_eq!(body["replica_id"], "r3fbe3834a3e");
    assert_eq!(body["persona_id"], "p3bb4745d4f9");
    assert_eq!(body["conversation_name"], "Echo Demo - Santa Claus - Holiday Helper");
}

#[tokio::test(start_paused = true)]
async fn provider_rejection_falls_back_to_in_character_replies() {
    let s = stack(MockTransport::new().with_json(401, json!({ "message": "Invalid key" })));

    let state = s.controller.mount().await;

    assert_eq!(state, SessionState::Fallback);
    assert_eq!(
        s.controller.last_error().as_deref(),
        Some("Tavus API error: 401 - Invalid key")
    );
    assert!(s
        .notifier
        .contains(PersonaVariant::SantaClaus.profile().connection_failure_notice));

    s.controller.send_message("I'd like a bicycle").unwrap().wait().await;

    let messages = s.controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content(), "I'd like a bicycle");
    assert_eq!(messages[2].sender(), Sender::Persona);
    assert!(santa_pool().contains(&messages[2].content()));
    // Only the failed create went over the wire.
    assert_eq!(s.transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn network_failure_is_recovered_like_an_api_error() {
    let s = stack(MockTransport::new().with_error(TransportError::Connect("refused".into())));

    assert_eq!(s.controller.mount().await, SessionState::Fallback);
    assert!(s.controller.last_error().unwrap().contains("refused"));
}

#[tokio::test(start_paused = true)]
async fn missing_credential_starts_in_fallback_without_requests() {
    let s = stack_with(MockTransport::new(), Credential::empty(), "santa-claus", 1);

    let state = s.controller.mount().await;

    assert_eq!(state, SessionState::Fallback);
    assert!(s.notifier.contains(CONFIGURE_KEY_PROMPT));
    assert_eq!(
        s.facade.list_replicas().await.unwrap_err(),
        ProviderError::Configuration
    );
    assert_eq!(s.transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn retry_after_failure_goes_live_and_routes_sends_to_provider() {
    let s = stack(MockTransport::new().with_error(TransportError::Timeout { timeout_secs: 30 }));
    assert_eq!(s.controller.mount().await, SessionState::Fallback);

    s.transport.push_json(200, conversation_created("c-retry"));
    assert_eq!(s.controller.retry().await, SessionState::Live);

    s.transport
        .push_json(200, json!({ "message": "Ho ho ho, live from the North Pole!" }));
    s.controller.send_message("Hello Santa").unwrap().wait().await;

    let calls = s.transport.get_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[2].url,
        "https://tavusapi.com/v2/conversations/c-retry/messages"
    );
    assert_eq!(calls[2].body, Some(json!({ "message_text": "Hello Santa" })));
    assert_eq!(
        s.controller.messages().last().unwrap().content(),
        "Ho ho ho, live from the North Pole!"
    );
}

#[tokio::test(start_paused = true)]
async fn saving_credential_from_chat_reconnects() {
    let s = stack_with(MockTransport::new(), Credential::empty(), "tech-mentor", 3);
    assert_eq!(s.controller.mount().await, SessionState::Fallback);

    s.transport.push_json(200, conversation_created("c-key"));
    let state = s.controller.on_credential_saved("fresh-key").await;

    assert_eq!(state, SessionState::Live);
    assert!(s.notifier.contains("Tavus API key configured!"));
    let calls = s.transport.get_calls();
    assert_eq!(calls[0].auth.as_ref().unwrap().value.expose_secret(), "fresh-key");
}

#[tokio::test(start_paused = true)]
async fn blank_key_save_keeps_working_key_and_live_session() {
    let s = stack_with(MockTransport::new(), Credential::empty(), "santa-claus", 5);
    s.controller.mount().await;
    s.transport.push_json(200, conversation_created("c-good"));
    assert_eq!(
        s.controller.on_credential_saved("good-user-key").await,
        SessionState::Live
    );
    s.notifier.drain();

    let state = s.controller.on_credential_saved("").await;

    assert_eq!(state, SessionState::Live);
    assert!(s.facade.is_configured());
    assert_eq!(s.facade.credentials().get().expose(), "good-user-key");
    assert!(!s.notifier.contains("Tavus API key configured!"));
    assert!(s.notifier.contains(CONFIGURE_KEY_PROMPT));

    s.transport.push_json(200, json!({ "message": "Still here!" }));
    s.controller.send_message("hello").unwrap().wait().await;

    assert_eq!(s.controller.state(), SessionState::Live);
    let calls = s.transport.get_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].auth.as_ref().unwrap().value.expose_secret(),
        "good-user-key"
    );
}

#[tokio::test(start_paused = true)]
async fn live_send_failure_degrades_once_and_keeps_replying() {
    let s = stack(
        MockTransport::new()
            .with_json(200, conversation_created("c-degrade"))
            .with_json(500, json!({ "error": "boom" }))
            .with_json(500, json!({ "error": "boom" })),
    );
    s.controller.mount().await;

    s.controller.send_message("first").unwrap().wait().await;

    assert_eq!(s.controller.state(), SessionState::Error);
    assert_eq!(
        s.controller.last_error().as_deref(),
        Some("Tavus API error: 500 - Unknown error")
    );

    // No longer live: the second reply is canned and never hits the wire.
    s.controller.send_message("second").unwrap().wait().await;
    assert_eq!(s.transport.call_count(), 2);

    let degraded = PersonaVariant::SantaClaus.profile().degraded_notice;
    let notices = s
        .notifier
        .notifications()
        .into_iter()
        .filter(|n| n.text == degraded)
        .count();
    assert_eq!(notices, 1);

    let replies: Vec<_> = s
        .controller
        .messages()
        .into_iter()
        .filter(|m| m.sender() == Sender::Persona)
        .skip(1)
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies.iter().all(|m| santa_pool().contains(&m.content())));
}

#[tokio::test(start_paused = true)]
async fn unawaited_sends_keep_user_order_and_all_get_replies() {
    let transport = MockTransport::new().with_json(200, conversation_created("c-burst"));
    for i in 0..5 {
        transport.push_json(200, json!({ "message": format!("reply {}", i) }));
    }
    let s = stack(transport);
    s.controller.mount().await;

    let inputs = ["one", "two", "three", "four", "five"];
    let pending: Vec<_> = inputs
        .iter()
        .map(|text| s.controller.send_message(text).unwrap())
        .collect();
    assert!(s.controller.is_typing());

    futures::future::join_all(pending.into_iter().map(|reply| reply.wait())).await;

    let messages = s.controller.messages();
    let users: Vec<_> = messages
        .iter()
        .filter(|m| m.sender() == Sender::User)
        .map(|m| m.content().to_string())
        .collect();
    assert_eq!(users, inputs);
    assert_eq!(messages.len(), 1 + 2 * inputs.len());
    assert_eq!(s.controller.pending_replies(), 0);
}

#[tokio::test(start_paused = true)]
async fn replies_after_unmount_are_discarded() {
    let s = stack(MockTransport::new().with_error(TransportError::Other("down".into())));
    s.controller.mount().await;

    let pending = s.controller.send_message("are you there?").unwrap();
    s.controller.unmount();
    pending.wait().await;

    assert_eq!(s.controller.messages().len(), 2);
}

// =============================================================================
// Properties
// =============================================================================

fn run_paused<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn fallback_replies_come_from_the_persona_pool(
        seed in any::<u64>(),
        persona_index in 0usize..7,
        text in "[a-zA-Z ]{1,40}",
    ) {
        let ids = [
            "santa-claus",
            "tavus-researcher",
            "ai-interviewer",
            "history-teacher",
            "wellness-coach",
            "creative-mentor",
            "tech-mentor",
        ];
        let id = ids[persona_index];
        prop_assume!(!text.trim().is_empty());

        let reply = run_paused(async {
            let s = stack_with(MockTransport::new(), Credential::empty(), id, seed);
            s.controller.mount().await;
            s.controller.send_message(&text).unwrap().wait().await;
            s.controller.messages().last().unwrap().content().to_string()
        });

        let pool = PersonaVariant::from_persona_id(&PersonaId::new(id)).profile().responses;
        prop_assert!(pool.contains(&reply.as_str()));
    }

    #[test]
    fn sampled_delays_stay_in_bounds(seed in any::<u64>(), base in 0u64..5_000, jitter in 0u64..5_000) {
        use rand::SeedableRng;
        let delay = ResponseDelay::new(
            std::time::Duration::from_millis(base),
            std::time::Duration::from_millis(jitter),
        );
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        prop_assert!(delay.bounds().contains(&delay.sample(&mut rng)));
    }
}
