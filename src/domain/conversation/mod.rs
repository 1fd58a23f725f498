//! Conversation module - messages, session record and lifecycle state.

mod delay;
mod message;
mod session;
mod state;

pub use delay::ResponseDelay;
pub use message::{Message, Sender};
pub use session::ConversationSession;
pub use state::SessionState;
