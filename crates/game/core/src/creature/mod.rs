//! Creatures: persisted records and their aggregated live form.
//!
//! - [`CreatureRecord`]: what the store keeps
//! - [`Creature`]: record + stat sheet rebuilt by [`Creature::aggregate`]
//! - inventory, economy and progression commands on [`Creature`]

mod aggregate;
pub mod inventory;
mod live;
pub mod record;

pub use inventory::InventoryError;
pub use live::Creature;
pub use record::{AppliedActiveEffect, CreatureRecord, Inventory, Progression, Vitals};

pub(crate) use aggregate::bound;
