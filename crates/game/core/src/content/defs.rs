//! Stat-bearing content definitions: species, classes, items, skills, perks,
//! directives, and locations.

use super::passive::{Passive, StatHooks};
use super::registry::{Content, ContentKind};

macro_rules! content_id {
    ($ty:ty, $kind:expr) => {
        impl Content for $ty {
            const KIND: ContentKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

macro_rules! passive_hooks {
    ($ty:ty) => {
        impl StatHooks for $ty {
            fn passives(&self) -> &[Passive] {
                &self.passives
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
}

/// Class definition. `Scaled` passives scale with creature level.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
    /// Ability ids forming the class deck.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipSlot {
    Weapon,
    Offhand,
    Head,
    Body,
    Accessory,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    /// Equippable items occupy exactly one slot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<EquipSlot>,
    /// Base trade value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u64,
    /// Applied while equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
    /// Applied while carried in the backpack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub carried_passives: Vec<Passive>,
    /// Abilities added to the deck while equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<String>,
}

impl ItemDef {
    pub fn equipped(&self) -> Equipped<'_> {
        Equipped(self)
    }

    pub fn carried(&self) -> Carried<'_> {
        Carried(self)
    }
}

/// Hook view of an equipped item.
pub struct Equipped<'a>(pub &'a ItemDef);

/// Hook view of an item sitting in the backpack.
pub struct Carried<'a>(pub &'a ItemDef);

impl StatHooks for Equipped<'_> {
    fn passives(&self) -> &[Passive] {
        &self.0.passives
    }
}

impl StatHooks for Carried<'_> {
    fn passives(&self) -> &[Passive] {
        &self.0.carried_passives
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerkDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
}

/// Globally toggleable rule bundle applied to every creature while enabled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shop: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot_table: Option<String>,
}

content_id!(SpeciesDef, ContentKind::Species);
content_id!(ClassDef, ContentKind::Classes);
content_id!(ItemDef, ContentKind::Items);
content_id!(SkillDef, ContentKind::Skills);
content_id!(PerkDef, ContentKind::Perks);
content_id!(DirectiveDef, ContentKind::Directives);
content_id!(LocationDef, ContentKind::Locations);

passive_hooks!(SpeciesDef);
passive_hooks!(ClassDef);
passive_hooks!(SkillDef);
passive_hooks!(PerkDef);
passive_hooks!(DirectiveDef);

pub(crate) use content_id;
