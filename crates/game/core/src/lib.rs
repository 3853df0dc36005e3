//! Deterministic creature, combat and fight rules.
//!
//! `fray-core` owns the canonical game rules and exposes pure APIs that the
//! runtime (and offline tools) reuse. Nothing here performs I/O or logs:
//! content arrives through [`ContentRegistry`], configuration through
//! [`EngineConfig`], randomness through [`rng::Dice`], and all of them are
//! bundled per call in an [`Env`].
//!
//! ```text
//! CreatureRecord ──load/aggregate──▶ Creature ──damage/heal/effects/cast──▶ dump ──▶ CreatureRecord
//! ```
pub mod combat;
pub mod config;
pub mod content;
pub mod creature;
pub mod effects;
pub mod env;
pub mod error;
pub mod fight;
pub mod rng;
pub mod stats;

pub use combat::{
    AbilityError, Cast, CastReport, DamageGroup, DamageLog, DamageMethod, DamageSource,
    DamageTotals, DamageType, HealGroup, HealLog, HealSource, HealType, Penetration,
    ShieldReaction, apply_heal, prepare_attack, prepare_cast, resolve_damage,
};
pub use config::EngineConfig;
pub use content::{ContentRegistry, ContentSource};
pub use creature::{Creature, CreatureRecord, InventoryError, Vitals};
pub use effects::{EffectError, EffectEvent, apply_effect, clear_effect, tick_effects};
pub use env::Env;
pub use error::{ErrorSeverity, GameError};
pub use fight::{Fight, FightError, FightOutcome, FightPhase, Roster, TurnSummary};
pub use stats::{StatKind, StatSheet, StatusFlags};
