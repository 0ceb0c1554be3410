//! Key-value persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// String key-value store. Writes replace the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> DomainResult<()>;
}
