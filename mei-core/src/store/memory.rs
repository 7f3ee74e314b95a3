//! Process-local backend. Nothing survives the process; used by tests and
//! by the CLI when `--backend memory` is passed.

use std::sync::Mutex;

use async_trait::async_trait;

use super::factory::{RepositoryFactory, StoreConfig};
use super::repository::{decode_state, encode_state, RepositoryError, StateRepository};
use crate::models::OrganizerState;

/// Holds the encoded snapshot so loads go through the same decoding as the
/// durable backends.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    body: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_body<T>(
        &self,
        f: impl FnOnce(&mut Option<String>) -> T,
    ) -> Result<T, RepositoryError> {
        let mut guard = self
            .body
            .lock()
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl StateRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<OrganizerState>, RepositoryError> {
        let body = self.with_body(|body| body.clone())?;
        body.as_deref().map(decode_state).transpose()
    }

    async fn save(&self, state: &OrganizerState) -> Result<(), RepositoryError> {
        let encoded = encode_state(state)?;
        self.with_body(|body| *body = Some(encoded))
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        self.with_body(|body| *body = None)
    }
}

pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn StateRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}
