//! Keyed collections of static content definitions.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use strum::{Display, EnumCount, EnumIter};

use super::ability::AbilityDef;
use super::defs::{ClassDef, DirectiveDef, ItemDef, LocationDef, PerkDef, SkillDef, SpeciesDef};
use super::economy::{LootTableDef, SchematicDef, ShopDef};
use super::effect::EffectDefinition;
use crate::error::{ErrorSeverity, GameError};

/// Every content kind the engine loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Items,
    Species,
    Classes,
    Abilities,
    Effects,
    Perks,
    Skills,
    Schematics,
    Locations,
    Shops,
    LootTables,
    Directives,
}

/// A static definition addressable by string id.
pub trait Content {
    const KIND: ContentKind;

    fn id(&self) -> &str;
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: ContentKind, id: String },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "REGISTRY_DUPLICATE_ID",
        }
    }
}

/// Immutable `id → definition` map for one content kind.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: HashMap<String, T>,
}

impl<T: Content> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a registry, rejecting duplicate ids.
    pub fn from_entries(entries: impl IntoIterator<Item = T>) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for entry in entries {
            match map.entry(entry.id().to_owned()) {
                Entry::Occupied(occupied) => {
                    return Err(RegistryError::DuplicateId {
                        kind: T::KIND,
                        id: occupied.key().clone(),
                    });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(entry);
                }
            }
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<T: Content> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Supplies full definition lists per content kind.
///
/// Implementations must return the complete set every time; registries are
/// replaced wholesale, never merged.
pub trait ContentSource {
    type Error: From<RegistryError>;

    fn load_all<T>(&self) -> Result<Vec<T>, Self::Error>
    where
        T: Content + LoadableContent;
}

/// Marker for definitions a [`ContentSource`] can decode.
#[cfg(feature = "serde")]
pub trait LoadableContent: serde::de::DeserializeOwned {}
#[cfg(feature = "serde")]
impl<T: serde::de::DeserializeOwned> LoadableContent for T {}

#[cfg(not(feature = "serde"))]
pub trait LoadableContent {}
#[cfg(not(feature = "serde"))]
impl<T> LoadableContent for T {}

/// A reference from one definition to an id missing from its registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingReference {
    pub from: ContentKind,
    pub owner: String,
    pub to: ContentKind,
    pub id: String,
}

/// Every content registry, built once at startup and on explicit reload.
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    pub items: Registry<ItemDef>,
    pub species: Registry<SpeciesDef>,
    pub classes: Registry<ClassDef>,
    pub abilities: Registry<AbilityDef>,
    pub effects: Registry<EffectDefinition>,
    pub perks: Registry<PerkDef>,
    pub skills: Registry<SkillDef>,
    pub schematics: Registry<SchematicDef>,
    pub locations: Registry<LocationDef>,
    pub shops: Registry<ShopDef>,
    pub loot_tables: Registry<LootTableDef>,
    pub directives: Registry<DirectiveDef>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every kind from `source` into a fresh registry.
    pub fn load<S: ContentSource>(source: &S) -> Result<Self, S::Error> {
        Ok(Self {
            items: Registry::from_entries(source.load_all::<ItemDef>()?)?,
            species: Registry::from_entries(source.load_all::<SpeciesDef>()?)?,
            classes: Registry::from_entries(source.load_all::<ClassDef>()?)?,
            abilities: Registry::from_entries(source.load_all::<AbilityDef>()?)?,
            effects: Registry::from_entries(source.load_all::<EffectDefinition>()?)?,
            perks: Registry::from_entries(source.load_all::<PerkDef>()?)?,
            skills: Registry::from_entries(source.load_all::<SkillDef>()?)?,
            schematics: Registry::from_entries(source.load_all::<SchematicDef>()?)?,
            locations: Registry::from_entries(source.load_all::<LocationDef>()?)?,
            shops: Registry::from_entries(source.load_all::<ShopDef>()?)?,
            loot_tables: Registry::from_entries(source.load_all::<LootTableDef>()?)?,
            directives: Registry::from_entries(source.load_all::<DirectiveDef>()?)?,
        })
    }

    /// Cross-registry references that do not resolve.
    ///
    /// Dangling ids are tolerated at runtime (lookups skip them); this is a
    /// load-time diagnostic only.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        let mut check = |from: ContentKind, owner: &str, to: ContentKind, id: &str, ok: bool| {
            if !ok {
                out.push(DanglingReference {
                    from,
                    owner: owner.to_owned(),
                    to,
                    id: id.to_owned(),
                });
            }
        };

        for effect in self.effects.iter() {
            for other in &effect.conflicts_with {
                check(
                    ContentKind::Effects,
                    &effect.id,
                    ContentKind::Effects,
                    other,
                    self.effects.contains(other),
                );
            }
        }
        for class in self.classes.iter() {
            for ability in &class.abilities {
                check(
                    ContentKind::Classes,
                    &class.id,
                    ContentKind::Abilities,
                    ability,
                    self.abilities.contains(ability),
                );
            }
        }
        for item in self.items.iter() {
            for ability in &item.abilities {
                check(
                    ContentKind::Items,
                    &item.id,
                    ContentKind::Abilities,
                    ability,
                    self.abilities.contains(ability),
                );
            }
        }
        for ability in self.abilities.iter() {
            for application in &ability.effects {
                check(
                    ContentKind::Abilities,
                    &ability.id,
                    ContentKind::Effects,
                    &application.id,
                    self.effects.contains(&application.id),
                );
            }
        }
        for shop in self.shops.iter() {
            for entry in &shop.stock {
                check(
                    ContentKind::Shops,
                    &shop.id,
                    ContentKind::Items,
                    &entry.item,
                    self.items.contains(&entry.item),
                );
            }
        }
        for table in self.loot_tables.iter() {
            for entry in &table.entries {
                check(
                    ContentKind::LootTables,
                    &table.id,
                    ContentKind::Items,
                    &entry.item,
                    self.items.contains(&entry.item),
                );
            }
        }
        for schematic in self.schematics.iter() {
            check(
                ContentKind::Schematics,
                &schematic.id,
                ContentKind::Items,
                &schematic.output,
                self.items.contains(&schematic.output),
            );
        }
        for location in self.locations.iter() {
            if let Some(shop) = &location.shop {
                check(
                    ContentKind::Locations,
                    &location.id,
                    ContentKind::Shops,
                    shop,
                    self.shops.contains(shop),
                );
            }
            if let Some(table) = &location.loot_table {
                check(
                    ContentKind::Locations,
                    &location.id,
                    ContentKind::LootTables,
                    table,
                    self.loot_tables.contains(table),
                );
            }
        }

        out
    }
}
