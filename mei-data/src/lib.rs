mod loader;

pub use loader::{DeductibleMismatch, TaxTableLoader, TaxTableLoaderError, TaxTableRecord};
