//! Stat model.
//!
//! ```text
//! [ StatKind baselines ]
//!      ↓  reset each aggregation pass
//! [ StatSheet (one TrackableStat per kind) ]
//!      ↓  preload / postload hooks push modifiers
//! [ TrackableStat::value(): lazy fold ]
//! ```
//!
//! Only bases persisted on the creature record survive a pass; every modifier
//! is regenerated by replaying the content sources.

pub mod kind;
pub mod sheet;
pub mod trackable;

pub use kind::StatKind;
pub use sheet::{Restrictions, StatSheet, StatusFlags};
pub use trackable::{Modifier, ModifierKind, TrackableStat};
