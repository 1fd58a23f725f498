//! HTTP transport adapters.
//!
//! - **ReqwestTransport** - Real network transport
//! - **MockTransport** - Scripted responses with call recording (testing)

mod mock_transport;
mod reqwest_transport;

pub use mock_transport::MockTransport;
pub use reqwest_transport::ReqwestTransport;
