//! Mock HTTP Transport for testing.
//!
//! Replays queued responses in order and records every request so tests
//! can assert what went over the wire (and how often).
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new()
//!     .with_json(200, json!({"replicas": []}))
//!     .with_error(TransportError::Connect("refused".into()));
//!
//! assert_eq!(transport.call_count(), 0);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Scripted transport.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        lock(&self.responses).push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a JSON response.
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.with_response(status, body.to_string())
    }

    /// Queues a transport failure.
    pub fn with_error(self, error: TransportError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Queues a response on a shared instance.
    pub fn push_json(&self, status: u16, body: Value) {
        lock(&self.responses).push_back(Ok(HttpResponse::new(status, body.to_string())));
    }

    /// Returns the number of requests sent.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<HttpRequest> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.calls).push(request);

        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response".to_string())))
    }
}
