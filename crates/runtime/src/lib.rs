//! Async orchestration around the fray-core rules engine.
//!
//! This crate wires a document store, hot-reloadable content, a fight cache
//! and background workers into a command API. Consumers build a [`Runtime`]
//! and issue commands through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the command handle and error types
//! - [`repository`] provides the store collaborator and the fight cache
//! - [`oracle`] holds the current content snapshot
//! - [`workers`] keeps the interval tick task
pub mod api;
pub mod dice;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod workers;

pub use api::{
    FightProgress, Result, RuntimeError, RuntimeHandle, TickFailure, TickReport,
};
pub use dice::RandDice;
pub use oracle::{ContentHandle, ContentSnapshot, ReloadReport};
pub use repository::{
    Collection, FightCache, InMemoryStore, JsonFileStore, RepositoryError, Store,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::TickWorker;
