//! Credential Source Port - where the provider client reads its API key.

use crate::domain::credential::Credential;

/// Supplies the currently active credential. Reads are cheap and never fail.
pub trait CredentialSource: Send + Sync {
    fn current(&self) -> Credential;
}

/// A credential that never changes. Handy for tests and one-shot tools.
#[derive(Debug, Clone)]
pub struct StaticCredential(Credential);

impl StaticCredential {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }
}

impl CredentialSource for StaticCredential {
    fn current(&self) -> Credential {
        self.0.clone()
    }
}
