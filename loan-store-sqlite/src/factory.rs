use async_trait::async_trait;

use loan_core::store::{PreferenceStore, StoreConfig, StoreError, StoreFactory};

use crate::repository::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`loan_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use loan_core::store::StoreRegistry;
/// use loan_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection strings:
    /// * `"sqlite:loan.db"` or a bare path such as `"loan.db"`. The file is
    ///   created if it does not exist.
    /// * `"sqlite::memory:"`, an ephemeral database (useful for tests).
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn PreferenceStore>, StoreError> {
        let store = SqliteStore::new(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Backend(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}
