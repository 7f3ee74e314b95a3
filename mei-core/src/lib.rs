pub mod calculations;
pub mod export;
pub mod ledger;
pub mod models;
pub mod organizer;
pub mod store;

pub use ledger::{EntryError, Ledger};
pub use models::*;
pub use organizer::Organizer;
pub use store::{RepositoryError, StateRepository};
