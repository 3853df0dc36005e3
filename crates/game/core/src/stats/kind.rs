//! Identifiers for every derived creature stat and their baselines.

use strum::{Display, EnumCount, EnumIter, EnumString};

/// Every derived stat carried by a live creature.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    // Vitals ceilings
    MaxHealth,
    Shield,
    ShieldRegen,
    Mana,
    ManaRegen,
    ActionPoints,
    ApRegen,
    Ammo,
    HeatCapacity,
    Cooling,
    MentalStrength,

    // Defense
    Armor,
    Filter,
    Tenacity,
    Parry,
    Deflect,
    StressResistance,
    /// Percent increase to incoming Physical/Energy damage.
    Vulnerability,

    // Offense
    Melee,
    Ranged,
    Accuracy,
    Tech,
    /// Percent of dealt health damage healed back.
    Vamp,
    /// Percent of dealt damage restored as shield.
    Siphon,
    AttackCost,

    // Turn economy
    Initiative,
    UltStackTarget,
    HandSize,
}

impl StatKind {
    /// Hardcoded value every stat starts each aggregation pass with.
    pub const fn baseline(self) -> f64 {
        match self {
            StatKind::MaxHealth => 100.0,
            StatKind::ActionPoints => 6.0,
            StatKind::ApRegen => 4.0,
            StatKind::Melee => 10.0,
            StatKind::Ranged => 10.0,
            StatKind::AttackCost => 2.0,
            StatKind::Ammo => 6.0,
            StatKind::HeatCapacity => 100.0,
            StatKind::Cooling => 10.0,
            StatKind::MentalStrength => 100.0,
            StatKind::UltStackTarget => 3.0,
            StatKind::HandSize => 3.0,
            StatKind::Shield
            | StatKind::ShieldRegen
            | StatKind::Mana
            | StatKind::ManaRegen
            | StatKind::Armor
            | StatKind::Filter
            | StatKind::Tenacity
            | StatKind::Parry
            | StatKind::Deflect
            | StatKind::StressResistance
            | StatKind::Vulnerability
            | StatKind::Accuracy
            | StatKind::Tech
            | StatKind::Vamp
            | StatKind::Siphon
            | StatKind::Initiative => 0.0,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
