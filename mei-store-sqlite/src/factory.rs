use async_trait::async_trait;
use mei_core::store::{RepositoryFactory, StoreConfig};
use mei_core::{RepositoryError, StateRepository};

use crate::repository::SqliteStateRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`mei_core::store::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use mei_core::store::RepositoryRegistry;
/// use mei_store_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::with_builtin_backends();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database at `config.location` and runs migrations.
    ///
    /// * A bare file path, e.g. `"mei_organizer.db"`, created if missing.
    /// * `":memory:"` for an ephemeral database.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn StateRepository>, RepositoryError> {
        let repo = SqliteStateRepository::open(&config.location).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
