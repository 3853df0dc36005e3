//! Unified error types surfaced by the runtime API.
//!
//! Wraps core rule violations, store failures and content loading so command
//! handlers can bubble them up with consistent context.

use fray_core::combat::AbilityError;
use fray_core::{EffectError, ErrorSeverity, FightError, GameError, InventoryError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{collection} `{id}` not found")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    #[error("{collection} `{id}` already exists")]
    AlreadyExists {
        collection: &'static str,
        id: String,
    },

    #[error("`{command}` requires game-master permission")]
    PermissionDenied { command: &'static str },

    #[error("`{id}` is not a member of fight `{fight}`")]
    NotInFight { fight: String, id: String },

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    Fight(#[from] FightError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("content load failed: {0:#}")]
    Content(#[source] anyhow::Error),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Ability(e) => e.severity(),
            Self::Effect(e) => e.severity(),
            Self::Fight(e) => e.severity(),
            Self::Inventory(e) => e.severity(),
            Self::NotFound { .. }
            | Self::AlreadyExists { .. }
            | Self::PermissionDenied { .. }
            | Self::NotInFight { .. } => ErrorSeverity::Validation,
            Self::Repository(_) | Self::Content(_) | Self::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RUNTIME_NOT_FOUND",
            Self::AlreadyExists { .. } => "RUNTIME_ALREADY_EXISTS",
            Self::PermissionDenied { .. } => "RUNTIME_PERMISSION_DENIED",
            Self::NotInFight { .. } => "RUNTIME_NOT_IN_FIGHT",
            Self::Ability(e) => e.error_code(),
            Self::Effect(e) => e.error_code(),
            Self::Fight(e) => e.error_code(),
            Self::Inventory(e) => e.error_code(),
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}

/// Simple boolean permission gate for game-master commands.
pub(crate) fn require_gm(gm: bool, command: &'static str) -> Result<()> {
    if gm {
        Ok(())
    } else {
        Err(RuntimeError::PermissionDenied { command })
    }
}
