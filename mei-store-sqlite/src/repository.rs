use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mei_core::store::{decode_state, encode_state, STATE_KEY};
use mei_core::{OrganizerState, RepositoryError, StateRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

pub const IN_MEMORY: &str = ":memory:";

/// Stores the encoded state snapshot in a single-row key-value table.
pub struct SqliteStateRepository {
    pool: SqlitePool,
}

impl SqliteStateRepository {
    /// Opens a database file, creating it if missing. [`IN_MEMORY`] opens a
    /// private in-memory database held by a single connection.
    pub async fn open(location: &str) -> Result<Self, RepositoryError> {
        let (options, max_connections) = if location == IN_MEMORY {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| RepositoryError::Configuration(e.to_string()))?;
            (options, 1)
        } else {
            let options = SqliteConnectOptions::new()
                .filename(location)
                .create_if_missing(true);
            (options, 4)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// When the snapshot was last written, if ever.
    pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT updated_at FROM kv_store WHERE key = ?")
            .bind(STATE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }
}

#[async_trait]
impl StateRepository for SqliteStateRepository {
    async fn load(&self) -> Result<Option<OrganizerState>, RepositoryError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM kv_store WHERE key = ?")
                .bind(STATE_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        body.as_deref().map(decode_state).transpose()
    }

    async fn save(&self, state: &OrganizerState) -> Result<(), RepositoryError> {
        let body = encode_state(state)?;

        sqlx::query(
            "INSERT INTO kv_store (key, body, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(STATE_KEY)
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!("state saved to sqlite");
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(STATE_KEY)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }
}
