//! Static game content: definitions, hooks and the keyed registries.
//!
//! Content is read-only during request handling. [`ContentRegistry`] is
//! rebuilt wholesale from a [`ContentSource`] at startup and on reload and is
//! passed explicitly to every consumer through [`crate::Env`].

pub mod ability;
pub mod defs;
pub mod economy;
pub mod effect;
pub mod passive;
pub mod registry;

pub use ability::{AbilityDef, AbilityTarget, DamageTemplate, HealTemplate, Scaling};
pub use defs::{
    Carried, ClassDef, DirectiveDef, EquipSlot, Equipped, ItemDef, LocationDef, PerkDef, SkillDef,
    SpeciesDef,
};
pub use economy::{LootEntry, LootTableDef, SchematicDef, ShopDef, ShopEntry};
pub use effect::{DisplaySeverity, EffectApplication, EffectDefinition, EffectKind, RemovalKind};
pub use passive::{Passive, PostloadContext, PreloadContext, Restriction, StatHooks};
pub use registry::{
    Content, ContentKind, ContentRegistry, ContentSource, DanglingReference, LoadableContent,
    Registry, RegistryError,
};
