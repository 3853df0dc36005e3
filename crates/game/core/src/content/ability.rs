//! Ability definitions drawn into a creature's hand during fights.

use super::defs::content_id;
use super::effect::EffectApplication;
use super::registry::{Content, ContentKind};
use crate::combat::{DamageMethod, DamageType, HealType, Penetration, ShieldReaction};
use crate::stats::{StatKind, StatSheet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityTarget {
    SelfOnly,
    #[default]
    Other,
}

/// Magnitude formula: `base + caster[scaling] × ratio`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat: Option<StatKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ratio: f64,
}

impl Scaling {
    pub fn flat(base: f64) -> Self {
        Self {
            base,
            stat: None,
            ratio: 0.0,
        }
    }

    pub fn resolve(&self, caster: &StatSheet) -> f64 {
        let scaled = self
            .stat
            .map(|stat| caster.value(stat) * self.ratio)
            .unwrap_or(0.0);
        self.base + scaled
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTemplate {
    pub damage_type: DamageType,
    pub amount: Scaling,
    #[cfg_attr(feature = "serde", serde(default))]
    pub method: DamageMethod,
    #[cfg_attr(feature = "serde", serde(default = "always"))]
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_dodge: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shield_reaction: ShieldReaction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub penetration: Penetration,
}

#[cfg(feature = "serde")]
fn always() -> f64 {
    100.0
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealTemplate {
    pub heal_type: HealType,
    pub amount: Scaling,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: AbilityTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ap_cost: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: f64,
    /// Heat generated on use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub heat: f64,
    /// Ultimates never enter the deck; they unlock with ult stacks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ultimate: bool,
    /// Consecutive fight turns required before use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_intensity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal: Option<HealTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<EffectApplication>,
}

impl AbilityDef {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            target: AbilityTarget::Other,
            ap_cost: 0.0,
            mana_cost: 0.0,
            heat: 0.0,
            ultimate: false,
            min_intensity: 0,
            damage: None,
            heal: None,
            effects: Vec::new(),
        }
    }
}

content_id!(AbilityDef, ContentKind::Abilities);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Modifier;

    #[test]
    fn scaling_reads_caster_stat() {
        let mut sheet = StatSheet::new();
        sheet.push(StatKind::Tech, Modifier::add(20.0));

        let scaling = Scaling {
            base: 5.0,
            stat: Some(StatKind::Tech),
            ratio: 0.5,
        };
        assert_eq!(scaling.resolve(&sheet), 15.0);
        assert_eq!(Scaling::flat(7.0).resolve(&sheet), 7.0);
    }
}
