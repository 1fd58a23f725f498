//! Terminal front end: `echo <persona-id>` chats with one persona.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use echo::adapters::{FileKeyValueStore, ReqwestTransport, TavusConfig, TavusProvider, TracingNotifier};
use echo::application::{
    ConversationSessionController, CredentialStore, IntegrationFacade, SessionSettings,
    CONFIGURE_KEY_PROMPT,
};
use echo::config::AppConfig;
use echo::domain::conversation::{Message, Sender};
use echo::domain::foundation::PersonaId;
use echo::domain::persona::{find_persona, prebuilt_personas};

const HELP: &str = "Commands: /retry /key <value> /clear-key /validate /replicas /quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("echo=info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let Some(persona_id) = std::env::args().nth(1) else {
        print_catalog();
        return Ok(());
    };
    let Some(persona) = find_persona(&PersonaId::new(persona_id.as_str())) else {
        eprintln!("Unknown persona '{}'", persona_id);
        print_catalog();
        return Ok(());
    };

    let notifier = Arc::new(TracingNotifier::new());
    let storage = Arc::new(FileKeyValueStore::new(&config.provider.credential_path));
    let credentials = Arc::new(
        CredentialStore::new(storage, notifier.clone())
            .with_default(config.provider.default_credential()),
    );
    credentials.load().await;

    let transport = Arc::new(ReqwestTransport::new(config.provider.timeout())?);
    let provider = Arc::new(TavusProvider::new(
        TavusConfig::new()
            .with_base_url(config.provider.base_url.clone())
            .with_embed_base_url(config.provider.embed_base_url.clone()),
        credentials.clone(),
        transport,
    ));
    let facade = Arc::new(IntegrationFacade::new(provider, credentials, notifier.clone()));

    let mut settings =
        SessionSettings::default().with_delay(config.conversation.response_delay());
    settings.conversation_name_prefix = config.conversation.conversation_name_prefix.clone();
    if let Some(url) = &config.conversation.callback_url {
        settings = settings.with_callback_url(url.clone());
    }

    let controller =
        ConversationSessionController::new(persona.clone(), facade.clone(), notifier, settings);
    let state = controller.mount().await;
    println!("Chatting with {} ({:?}). {}", persona.name, state, HELP);

    let mut printed = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                printed = print_new(&controller.messages(), printed, &persona.name);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                match line.split_once(' ').unwrap_or((line, "")) {
                    ("", _) => {}
                    ("/quit", _) => break,
                    ("/retry", _) => {
                        let state = controller.retry().await;
                        println!("[session {:?}]", state);
                    }
                    ("/key", value) if value.trim().is_empty() => {
                        println!("{} Usage: /key <value>", CONFIGURE_KEY_PROMPT);
                    }
                    ("/key", value) => {
                        let state = controller.on_credential_saved(value).await;
                        println!("[session {:?}]", state);
                    }
                    ("/clear-key", _) => facade.clear_api_key().await,
                    ("/validate", _) => {
                        let valid = facade.validate_credential().await;
                        println!("[credential {}]", if valid { "valid" } else { "invalid" });
                    }
                    ("/replicas", _) => match facade.list_replicas().await {
                        Ok(replicas) => {
                            for replica in replicas {
                                println!("  {} {} {}", replica.replica_id, replica.replica_name, replica.status);
                            }
                        }
                        Err(e) => println!("[{}]", e),
                    },
                    (cmd, _) if cmd.starts_with('/') => println!("{}", HELP),
                    _ => {
                        // The reply arrives later and is printed on a tick.
                        let _ = controller.send_message(line);
                    }
                }
                printed = print_new(&controller.messages(), printed, &persona.name);
            }
        }
    }

    controller.unmount();
    Ok(())
}

fn print_new(messages: &[Message], printed: usize, persona_name: &str) -> usize {
    for message in messages.iter().skip(printed) {
        let who = match message.sender() {
            Sender::User => "you",
            Sender::Persona => persona_name,
        };
        println!("[{}] {}: {}", message.display_timestamp(), who, message.content());
    }
    messages.len().max(printed)
}

fn print_catalog() {
    println!("Usage: echo <persona-id>\n\nPersonas:");
    for persona in prebuilt_personas() {
        println!("  {:<22} {}", persona.id.as_str(), persona.name);
    }
}
