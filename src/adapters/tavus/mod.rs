//! Tavus provider adapters.
//!
//! - **TavusProvider** - Real client for the Tavus v2 HTTP API
//! - **MockConversationProvider** - Scripted provider (testing/development)

mod mock_provider;
mod tavus_provider;

pub use mock_provider::{MockCall, MockConversationProvider};
pub use tavus_provider::{TavusConfig, TavusProvider, API_KEY_HEADER};
