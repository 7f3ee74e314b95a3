use async_trait::async_trait;
use thiserror::Error;

use crate::models::OrganizerState;

/// The single key the whole state snapshot is stored under.
pub const STATE_KEY: &str = "mei_organizer_state";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Persistence provider for the state snapshot.
///
/// Saves are all-or-nothing: a backend either stores the whole snapshot or
/// reports an error and leaves the previous one in place.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<OrganizerState>, RepositoryError>;

    async fn save(&self, state: &OrganizerState) -> Result<(), RepositoryError>;

    async fn clear(&self) -> Result<(), RepositoryError>;
}

/// Serializes a snapshot to the JSON body every backend stores.
pub fn encode_state(state: &OrganizerState) -> Result<String, RepositoryError> {
    serde_json::to_string(state).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

pub fn decode_state(body: &str) -> Result<OrganizerState, RepositoryError> {
    serde_json::from_str(body).map_err(|e| RepositoryError::Serialization(e.to_string()))
}
