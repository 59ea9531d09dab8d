use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// String-keyed, string-valued storage for the last-used form values.
///
/// Semantics are last-write-wins with a single writer. [`set_all`] is the
/// only multi-key operation and is all-or-nothing.
///
/// [`set_all`]: PreferenceStore::set_all
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never set or has
    /// been deleted.
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Inserts or overwrites `key`.
    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Inserts or overwrites every `(key, value)` pair. On error none of
    /// them are written.
    async fn set_all(
        &self,
        entries: &[(&str, &str)],
    ) -> Result<(), StoreError>;

    /// Removes `key`. Deleting a missing key is not an error.
    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn set_all(
        &self,
        entries: &[(&str, &str)],
    ) -> Result<(), StoreError> {
        (**self).set_all(entries).await
    }

    async fn delete(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
