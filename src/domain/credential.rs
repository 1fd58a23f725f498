//! Provider API credential value object.
//!
//! The secret is only ever exposed to build the provider's auth header.
//! `Debug` output is redacted by `secrecy`.

use secrecy::{ExposeSecret, Secret};

/// Built-in demo credential used until the user supplies their own.
pub const DEFAULT_CREDENTIAL: &str = "echo-demo-credential";

/// An opaque API key identifying the caller to the provider.
#[derive(Debug, Clone)]
pub struct Credential(Secret<String>);

impl Credential {
    /// Wraps a key, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into().trim().to_string()))
    }

    /// The built-in default credential.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_CREDENTIAL)
    }

    /// An empty credential. Every provider call fails fast with it.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Exposes the raw key. Only transports building auth headers should call this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Credential {}
