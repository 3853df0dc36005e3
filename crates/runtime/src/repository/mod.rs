//! Persistence adapters for runtime state.
//!
//! The [`Store`] collaborator holds creature records and fights as JSON
//! documents. [`FightCache`] is a read-through TTL cache in front of it and is
//! never the system of record.

mod cache;
mod documents;
mod error;
mod file;
mod memory;
mod traits;

pub use cache::FightCache;
pub use documents::{load_document, save_document};
pub use error::{RepositoryError, Result};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use traits::{Collection, Store, document_id};
