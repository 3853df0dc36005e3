//! Active effect lifecycle.
//!
//! Definitions live in [`crate::content::EffectDefinition`]; applied instances
//! live in the creature record. This module moves instances through their
//! lifecycle and reports what happened as [`EffectEvent`]s.

pub mod hooks;
pub mod lifecycle;

use thiserror::Error;

pub use hooks::{EffectHooks, Impact};
pub use lifecycle::{apply_effect, clear_effect, tick_effects};

use crate::combat::{DamageLog, HealLog};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum EffectEvent {
    Applied { id: String, severity: u32, ticks: i32 },
    Refreshed { id: String, severity: u32, ticks: i32 },
    Ticked { id: String, remaining: i32 },
    Damaged { id: String, log: DamageLog },
    Healed { id: String, log: HealLog },
    Expired { id: String },
    Deleted { id: String },
}

impl EffectEvent {
    pub fn effect_id(&self) -> &str {
        match self {
            Self::Applied { id, .. }
            | Self::Refreshed { id, .. }
            | Self::Ticked { id, .. }
            | Self::Damaged { id, .. }
            | Self::Healed { id, .. }
            | Self::Expired { id }
            | Self::Deleted { id } => id,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),

    #[error("effect `{0}` is not applied")]
    NotApplied(String),

    #[error("effect `{id}` needs positive ticks or -1, got {ticks}")]
    InvalidTicks { id: String, ticks: i32 },
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEffect(_) => "EFFECT_UNKNOWN",
            Self::NotApplied(_) => "EFFECT_NOT_APPLIED",
            Self::InvalidTicks { .. } => "EFFECT_INVALID_TICKS",
        }
    }
}
