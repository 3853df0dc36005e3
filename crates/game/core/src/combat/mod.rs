//! Combat resolution: damage, healing, basic attacks and ability casts.
//!
//! Everything here is deterministic given a [`crate::rng::Dice`]. Results are
//! reported as logs ([`DamageLog`], [`HealLog`], [`CastReport`]) that the
//! runtime forwards to presentation.
//!
//! # Core Functions
//!
//! - [`resolve_damage`]: chance roll, mitigation, shield, health, injuries, stress
//! - [`apply_heal`]: per-type restoration clamped to derived maxima
//! - [`prepare_attack`] / [`prepare_cast`]: validate and pay costs, then
//!   [`Cast::resolve`] against the target

pub mod abilities;
pub mod attack;
pub mod damage;
pub mod heal;

use std::collections::BTreeMap;

pub use abilities::{clear_hand, deck, draw_hand, unlocked_ultimates};
pub use attack::{AbilityError, Cast, CastReport, prepare_attack, prepare_cast};
pub use damage::{protection_multiplier, resolve_damage};
pub use heal::apply_heal;

/// Damage category; decides which protection stat applies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Bypasses every protection.
    True,
    /// Reduced by Armor minus lethality.
    Physical,
    /// Reduced by Filter minus cutting.
    Energy,
    /// Adds to stress instead of health.
    Stress,
}

impl DamageType {
    pub fn hits_health(self) -> bool {
        !matches!(self, DamageType::Stress)
    }
}

/// How a damage source interacts with the target's shield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShieldReaction {
    /// Shield absorbs first (minus passthrough); overflow hits health.
    #[default]
    Normal,
    /// Straight to health.
    Ignore,
    /// Shield only; anything the shield cannot absorb is dropped.
    Only,
}

/// Delivery method; selects the dodge stat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageMethod {
    #[default]
    Direct,
    Melee,
    Ranged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Penetration {
    /// Flat armor ignored by Physical sources.
    pub lethality: f64,
    /// Percentage of each source that bypasses the shield under `Normal`.
    pub passthrough: f64,
    /// Flat filter ignored by Energy sources.
    pub cutting: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageSource {
    pub damage_type: DamageType,
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shield_reaction: ShieldReaction,
}

impl DamageSource {
    pub fn new(damage_type: DamageType, value: f64) -> Self {
        Self {
            damage_type,
            value,
            shield_reaction: ShieldReaction::Normal,
        }
    }

    pub fn with_reaction(mut self, shield_reaction: ShieldReaction) -> Self {
        self.shield_reaction = shield_reaction;
        self
    }
}

/// One damage event: several typed sources sharing a single chance roll.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageGroup {
    pub sources: Vec<DamageSource>,
    pub method: DamageMethod,
    /// Success chance in percent before dodge.
    pub chance: f64,
    pub use_dodge: bool,
    pub penetration: Penetration,
    /// Opaque attribution tags.
    pub from: Option<String>,
    pub to: Option<String>,
    pub cause: Option<String>,
}

impl DamageGroup {
    pub fn new(sources: impl IntoIterator<Item = DamageSource>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            method: DamageMethod::Direct,
            chance: 100.0,
            use_dodge: false,
            penetration: Penetration::default(),
            from: None,
            to: None,
            cause: None,
        }
    }

    pub fn single(damage_type: DamageType, value: f64) -> Self {
        Self::new([DamageSource::new(damage_type, value)])
    }

    pub fn with_method(mut self, method: DamageMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }

    pub fn dodgeable(mut self) -> Self {
        self.use_dodge = true;
        self
    }

    pub fn with_penetration(mut self, penetration: Penetration) -> Self {
        self.penetration = penetration;
        self
    }

    pub fn attributed(
        mut self,
        from: Option<String>,
        to: Option<String>,
        cause: impl Into<String>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self.cause = Some(cause.into());
        self
    }

    pub fn total(&self) -> f64 {
        self.sources.iter().map(|s| s.value).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTotals {
    /// Final (post-mitigation) amount per damage type.
    pub by_type: BTreeMap<DamageType, f64>,
    pub total: f64,
    pub shield: f64,
    pub health: f64,
    pub injuries: f64,
    pub stress: f64,
    /// `original − final`; negative when vulnerability amplified the group.
    pub mitigated: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageLog {
    pub successful: bool,
    /// Final chance after dodge, in `[0, 100]`.
    pub chance: f64,
    pub original: DamageGroup,
    /// Sources after mitigation.
    pub final_group: DamageGroup,
    pub totals: DamageTotals,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealType {
    Health,
    Shield,
    /// Health that may exceed the effective maximum until the next
    /// aggregation.
    Overheal,
    ActionPoints,
    Injuries,
    Stress,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealSource {
    pub heal_type: HealType,
    pub value: f64,
}

impl HealSource {
    pub fn new(heal_type: HealType, value: f64) -> Self {
        Self { heal_type, value }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealGroup {
    pub sources: Vec<HealSource>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub cause: Option<String>,
}

impl HealGroup {
    pub fn new(sources: impl IntoIterator<Item = HealSource>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            from: None,
            to: None,
            cause: None,
        }
    }

    pub fn single(heal_type: HealType, value: f64) -> Self {
        Self::new([HealSource::new(heal_type, value)])
    }

    pub fn attributed(
        mut self,
        from: Option<String>,
        to: Option<String>,
        cause: impl Into<String>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self.cause = Some(cause.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealLog {
    pub group: HealGroup,
    /// Sum of requested source values.
    pub requested: f64,
    /// Amount actually applied per type.
    pub applied: BTreeMap<HealType, f64>,
}

impl HealLog {
    pub fn applied(&self, heal_type: HealType) -> f64 {
        self.applied.get(&heal_type).copied().unwrap_or(0.0)
    }
}
