//! Application layer - services that orchestrate domain rules over ports.
//!
//! - `CredentialStore` - Process-wide provider API key
//! - `IntegrationFacade` - Provider calls with busy/error bookkeeping and toasts
//! - `ConversationSessionController` - Chat session state machine with local fallback
//! - `MediaSessionManager` - Local capture, peer connections and teardown
//! - `VideoCallController` - Video call screen with explicit demo mode

mod conversation_controller;
mod credential_store;
mod integration;
mod media_session;
mod video_call;

pub use conversation_controller::{
    ConversationSessionController, PendingReply, SessionSettings, CONFIGURE_KEY_PROMPT,
};
pub use credential_store::{CredentialStore, CREDENTIAL_KEY};
pub use integration::IntegrationFacade;
pub use media_session::{MediaSessionManager, MediaSettings, MediaSnapshot};
pub use video_call::{VideoCallController, API_KEY_REQUIRED};
