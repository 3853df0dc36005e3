//! Persisted creature form.
//!
//! The record holds only what must survive between requests: identity,
//! inventory, progression, current vitals and applied effects. Derived stats
//! are rebuilt from it on every aggregation pass.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::EngineConfig;

/// Current resource values.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Vitals {
    pub health: f64,
    pub shield: f64,
    pub mana: f64,
    pub action_points: f64,
    /// Persistent reduction of effective maximum health.
    pub injuries: f64,
    pub stress: f64,
    pub heat: f64,
    pub ammo: f64,
    pub ult_stacks: u32,
    /// Consecutive turns taken in the current fight.
    pub intensity: u32,
}

/// One applied instance of an active effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedActiveEffect {
    pub id: String,
    pub severity: u32,
    /// Remaining ticks; `-1` marks a persistent effect.
    pub ticks: i32,
}

impl AppliedActiveEffect {
    pub const PERSISTENT: i32 = -1;

    pub fn is_persistent(&self) -> bool {
        self.ticks == Self::PERSISTENT
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Inventory {
    pub equipped: Vec<String>,
    pub backpack: Vec<String>,
    pub skills: Vec<String>,
    pub perks: Vec<String>,
    pub schematics: Vec<String>,
    pub materials: BTreeMap<String, u32>,
    pub money: u64,
    /// Ability ids currently drawn.
    pub hand: ArrayVec<String, { EngineConfig::MAX_HAND_SIZE }>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureRecord {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub avatar: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub species: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub class: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub npc: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Inventory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub progression: Progression,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vitals: Vitals,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active_effects: Vec<AppliedActiveEffect>,
}

impl CreatureRecord {
    /// Blank record. Vitals start at zero; call
    /// [`crate::Creature::restore`] to fill them to their maxima.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            species: None,
            class: None,
            npc: false,
            location: None,
            inventory: Inventory::default(),
            progression: Progression::default(),
            vitals: Vitals::default(),
            active_effects: Vec::new(),
        }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_health(mut self, health: f64) -> Self {
        self.vitals.health = health;
        self
    }

    pub fn npc(mut self) -> Self {
        self.npc = true;
        self
    }
}
