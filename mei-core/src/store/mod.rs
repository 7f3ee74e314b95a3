pub mod factory;
pub mod json_file;
pub mod memory;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryRegistry, StoreConfig};
pub use json_file::{JsonFileRepository, JsonFileRepositoryFactory};
pub use memory::{MemoryRepository, MemoryRepositoryFactory};
pub use repository::{decode_state, encode_state, RepositoryError, StateRepository, STATE_KEY};
