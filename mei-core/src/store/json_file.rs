//! Single JSON file backend.
//!
//! Saves write a sibling temporary file and rename it over the target, so a
//! failed write never leaves a truncated snapshot behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::factory::{RepositoryFactory, StoreConfig};
use super::repository::{decode_state, encode_state, RepositoryError, StateRepository};
use crate::models::OrganizerState;

#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl StateRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<OrganizerState>, RepositoryError> {
        let body = match fs::read_to_string(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::Connection(e.to_string())),
        };
        decode_state(&body).map(Some)
    }

    async fn save(&self, state: &OrganizerState) -> Result<(), RepositoryError> {
        let body = encode_state(state)?;
        let temp = self.temp_path();

        fs::write(&temp, body)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Database(e.to_string())),
        }
    }
}

pub struct JsonFileRepositoryFactory;

#[async_trait]
impl RepositoryFactory for JsonFileRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "json-file"
    }

    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn StateRepository>, RepositoryError> {
        if config.location.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "json-file backend needs a file path".to_string(),
            ));
        }
        Ok(Box::new(JsonFileRepository::new(&config.location)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("state.json"));

        assert_eq!(repo.load().await, Ok(None));
    }

    #[tokio::test]
    async fn save_then_load_returns_snapshot() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("state.json"));
        let mut state = OrganizerState::default();
        state.identification.name = "Maria".to_string();

        repo.save(&state).await.unwrap();

        assert_eq!(repo.load().await, Ok(Some(state)));
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let result = JsonFileRepository::new(&path).load().await;

        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[tokio::test]
    async fn save_into_missing_directory_fails_without_leaving_files() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("absent").join("state.json"));

        let result = repo.save(&OrganizerState::default()).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert!(!repo.path().exists());
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn load_runs_alongside_other_tasks() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("state.json"));
        repo.save(&OrganizerState::default()).await.unwrap();

        let ticker = tokio::spawn(async { tokio::task::yield_now().await });
        let (loaded, ticked) = tokio::join!(repo.load(), ticker);

        assert_eq!(loaded, Ok(Some(OrganizerState::default())));
        assert!(ticked.is_ok());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("state.json"));
        repo.save(&OrganizerState::default()).await.unwrap();

        repo.clear().await.unwrap();
        repo.clear().await.unwrap();

        assert_eq!(repo.load().await, Ok(None));
    }

    #[tokio::test]
    async fn factory_rejects_empty_location() {
        let config = StoreConfig {
            backend: "json-file".to_string(),
            location: " ".to_string(),
        };

        assert!(matches!(
            JsonFileRepositoryFactory.create(&config).await,
            Err(RepositoryError::Configuration(_))
        ));
    }
}
