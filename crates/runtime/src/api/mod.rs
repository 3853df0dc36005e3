//! Public API surface of the runtime.
//!
//! [`RuntimeHandle`] carries every command; errors are unified under
//! [`RuntimeError`].

mod admin;
mod creatures;
mod errors;
mod fights;
mod handle;

pub use admin::{TickFailure, TickReport};
pub use errors::{RepositoryError, Result, RuntimeError};
pub use fights::FightProgress;
pub use handle::RuntimeHandle;

pub(crate) use handle::Shared;
