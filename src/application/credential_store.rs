//! CredentialStore - the single writer of the provider API key.
//!
//! Seeded with a built-in default, overridden by whatever the user saved
//! last. Storage failures are logged and otherwise ignored: the in-memory
//! credential is always authoritative for the running process.
//!
//! Concurrent `set`/`clear` calls are last-write-wins.
//!
//! # Example
//!
//! ```ignore
//! let credentials = CredentialStore::new(store, notifier);
//! credentials.load().await;
//!
//! credentials.set("my-key").await;
//! assert_eq!(credentials.get().expose(), "my-key");
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::credential::Credential;
use crate::ports::{CredentialSource, KeyValueStore, Notifier};

/// Storage key of the persisted credential.
pub const CREDENTIAL_KEY: &str = "tavus-api-key";

#[derive(Debug, Clone)]
struct Active {
    credential: Credential,
    user_provided: bool,
}

/// Process-wide credential holder, constructed once by the composition root.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    default: Credential,
    active: RwLock<Active>,
}

impl CredentialStore {
    /// Creates a store holding the built-in default. Call `load` to pick up
    /// a persisted key.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let default = Credential::builtin();
        Self {
            store,
            notifier,
            active: RwLock::new(Active {
                credential: default.clone(),
                user_provided: false,
            }),
            default,
        }
    }

    /// Replaces the built-in default (e.g. from configuration).
    pub fn with_default(self, default: Credential) -> Self {
        Self {
            active: RwLock::new(Active {
                credential: default.clone(),
                user_provided: false,
            }),
            default,
            ..self
        }
    }

    /// Adopts the persisted key, if there is a non-blank one.
    pub async fn load(&self) {
        match self.store.get(CREDENTIAL_KEY).await {
            Ok(Some(value)) if !value.trim().is_empty() => {
                self.replace(Active {
                    credential: Credential::new(value),
                    user_provided: true,
                });
                tracing::info!("Loaded saved provider API key");
            }
            Ok(_) => tracing::debug!("No saved provider API key, using default"),
            Err(e) => tracing::warn!("Failed to read saved API key: {}", e),
        }
    }

    /// Current credential.
    pub fn get(&self) -> Credential {
        self.snapshot().credential
    }

    /// Overwrites the credential, persists it and confirms to the user.
    ///
    /// Blank input is rejected and leaves the active credential untouched.
    /// Returns whether the value was taken.
    pub async fn set(&self, value: &str) -> bool {
        let credential = Credential::new(value);
        if credential.is_empty() {
            tracing::warn!("Ignoring blank provider API key");
            return false;
        }
        self.replace(Active {
            credential: credential.clone(),
            user_provided: true,
        });

        if let Err(e) = self.store.set(CREDENTIAL_KEY, credential.expose()).await {
            tracing::warn!("Failed to persist API key: {}", e);
        }

        self.notifier.success("Tavus API key configured!");
        true
    }

    /// Restores the default and forgets the persisted key.
    pub async fn clear(&self) {
        self.replace(Active {
            credential: self.default.clone(),
            user_provided: false,
        });

        if let Err(e) = self.store.remove(CREDENTIAL_KEY).await {
            tracing::warn!("Failed to remove saved API key: {}", e);
        }
    }

    /// True if a non-empty credential is active.
    pub fn is_configured(&self) -> bool {
        !self.snapshot().credential.is_empty()
    }

    /// True if the active credential came from the user rather than the default.
    pub fn is_user_provided(&self) -> bool {
        self.snapshot().user_provided
    }

    fn snapshot(&self) -> Active {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, active: Active) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = active;
    }
}

impl CredentialSource for CredentialStore {
    fn current(&self) -> Credential {
        self.get()
    }
}
