//! Key/Value Store Port - durable client-side storage.
//!
//! Models the browser-style local storage the credential lives in: string
//! keys, string values, last write wins.

use async_trait::async_trait;

/// Errors that can occur during key/value storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to serialize store: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize store: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for durable string key/value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
