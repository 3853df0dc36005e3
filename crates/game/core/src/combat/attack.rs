//! Basic attacks and ability casts.
//!
//! Casting is split in two so caster and target are never borrowed mutably at
//! the same time:
//!
//! 1. [`prepare_attack`] / [`prepare_cast`] validate against the caster and
//!    pay every cost, producing a [`Cast`]
//! 2. [`Cast::resolve`] applies the cast to the target
//! 3. [`CastReport::settle`] grants the caster its rewards (ult stacks, vamp,
//!    siphon)

use thiserror::Error;

use super::{
    DamageGroup, DamageLog, DamageMethod, DamageSource, DamageType, HealGroup, HealLog, HealSource,
    HealType, apply_heal, resolve_damage,
};
use crate::content::{AbilityTarget, EffectApplication};
use crate::creature::Creature;
use crate::effects::{EffectEvent, apply_effect};
use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::rng::Dice;
use crate::stats::{StatKind, StatusFlags};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AbilityError {
    #[error("unknown ability `{0}`")]
    UnknownAbility(String),

    #[error("ability `{0}` is not in hand")]
    NotInHand(String),

    #[error("ultimate `{ability}` needs {target} stacks, have {stacks}")]
    UltimateLocked {
        ability: String,
        stacks: u32,
        target: f64,
    },

    #[error("cannot attack")]
    AttackRestricted,

    #[error("cannot use abilities")]
    AbilitiesRestricted,

    #[error("needs {needed} action points, have {have}")]
    InsufficientActionPoints { needed: f64, have: f64 },

    #[error("needs {needed} mana, have {have}")]
    InsufficientMana { needed: f64, have: f64 },

    #[error("heat {heat} would exceed capacity {capacity}")]
    Overheated { heat: f64, capacity: f64 },

    #[error("needs intensity {needed}, have {have}")]
    IntensityTooLow { needed: u32, have: u32 },

    #[error("out of ammo")]
    OutOfAmmo,

    #[error("ability `{ability}` applies unknown effect `{effect}`")]
    UnknownEffect { ability: String, effect: String },
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAbility(_) => "ABILITY_UNKNOWN",
            Self::NotInHand(_) => "ABILITY_NOT_IN_HAND",
            Self::UltimateLocked { .. } => "ABILITY_ULTIMATE_LOCKED",
            Self::AttackRestricted => "ABILITY_ATTACK_RESTRICTED",
            Self::AbilitiesRestricted => "ABILITY_ABILITIES_RESTRICTED",
            Self::InsufficientActionPoints { .. } => "ABILITY_INSUFFICIENT_AP",
            Self::InsufficientMana { .. } => "ABILITY_INSUFFICIENT_MANA",
            Self::Overheated { .. } => "ABILITY_OVERHEATED",
            Self::IntensityTooLow { .. } => "ABILITY_INTENSITY_TOO_LOW",
            Self::OutOfAmmo => "ABILITY_OUT_OF_AMMO",
            Self::UnknownEffect { .. } => "ABILITY_UNKNOWN_EFFECT",
        }
    }
}

/// A paid-for action waiting to be applied to its target.
#[derive(Clone, Debug, PartialEq)]
pub struct Cast {
    pub caster: String,
    /// `None` for a basic attack.
    pub ability: Option<String>,
    pub target_self: bool,
    pub damage: Option<DamageGroup>,
    pub heal: Option<HealGroup>,
    pub effects: Vec<EffectApplication>,
    vamp: f64,
    siphon: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastReport {
    pub caster: String,
    pub target: String,
    pub ability: Option<String>,
    pub damage: Option<DamageLog>,
    pub heal: Option<HealLog>,
    pub effects: Vec<EffectEvent>,
    /// Vamp and siphon restoration on the caster.
    pub caster_heal: Option<HealLog>,
    pub ult_stacks_gained: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    rewards: Rewards,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Rewards {
    basic_attack: bool,
    vamp: f64,
    siphon: f64,
}

/// Validates a basic attack and pays its cost.
///
/// Value is the Melee or Ranged stat, chance is `base_hit_chance + Accuracy`
/// and the target may dodge.
pub fn prepare_attack(
    attacker: &mut Creature,
    method: DamageMethod,
    env: &Env<'_>,
) -> Result<Cast, AbilityError> {
    if !attacker.flags().contains(StatusFlags::CAN_ATTACK) {
        return Err(AbilityError::AttackRestricted);
    }
    let cost = attacker.stat(StatKind::AttackCost).max(0.0);
    let have = attacker.vitals().action_points;
    if have < cost {
        return Err(AbilityError::InsufficientActionPoints { needed: cost, have });
    }
    let ranged = matches!(method, DamageMethod::Ranged);
    if ranged && attacker.vitals().ammo < 1.0 {
        return Err(AbilityError::OutOfAmmo);
    }

    let value = match method {
        DamageMethod::Ranged => attacker.stat(StatKind::Ranged),
        _ => attacker.stat(StatKind::Melee),
    };
    let chance = env.config.base_hit_chance + attacker.stat(StatKind::Accuracy);
    let damage = DamageGroup::single(DamageType::Physical, value.max(0.0))
        .with_method(method)
        .with_chance(chance)
        .dodgeable();

    let vamp = attacker.stat(StatKind::Vamp);
    let siphon = attacker.stat(StatKind::Siphon);
    let vitals = attacker.vitals_mut();
    vitals.action_points -= cost;
    if ranged {
        vitals.ammo -= 1.0;
    }

    Ok(Cast {
        caster: attacker.id().to_owned(),
        ability: None,
        target_self: false,
        damage: Some(damage),
        heal: None,
        effects: Vec::new(),
        vamp,
        siphon,
    })
}

/// Validates an ability cast and pays its costs.
///
/// Every check runs before anything is deducted. Regular abilities leave the
/// hand; ultimates consume the stacks that unlocked them.
pub fn prepare_cast(
    caster: &mut Creature,
    ability: &str,
    env: &Env<'_>,
) -> Result<Cast, AbilityError> {
    let def = env
        .content
        .abilities
        .get(ability)
        .ok_or_else(|| AbilityError::UnknownAbility(ability.to_owned()))?;
    if !caster.flags().contains(StatusFlags::CAN_USE_ABILITIES) {
        return Err(AbilityError::AbilitiesRestricted);
    }

    let vitals = caster.vitals();
    let ult_target = caster.stat(StatKind::UltStackTarget).max(0.0);
    if def.ultimate {
        if !super::unlocked_ultimates(caster, env).contains(&def.id) {
            return Err(AbilityError::UltimateLocked {
                ability: def.id.clone(),
                stacks: vitals.ult_stacks,
                target: ult_target,
            });
        }
    } else if !caster.record().inventory.hand.contains(&def.id) {
        return Err(AbilityError::NotInHand(def.id.clone()));
    }

    if vitals.action_points < def.ap_cost {
        return Err(AbilityError::InsufficientActionPoints {
            needed: def.ap_cost,
            have: vitals.action_points,
        });
    }
    if vitals.mana < def.mana_cost {
        return Err(AbilityError::InsufficientMana {
            needed: def.mana_cost,
            have: vitals.mana,
        });
    }
    let capacity = caster.stat(StatKind::HeatCapacity);
    if vitals.heat + def.heat > capacity {
        return Err(AbilityError::Overheated {
            heat: vitals.heat + def.heat,
            capacity,
        });
    }
    if vitals.intensity < def.min_intensity {
        return Err(AbilityError::IntensityTooLow {
            needed: def.min_intensity,
            have: vitals.intensity,
        });
    }
    if let Some(missing) = def
        .effects
        .iter()
        .find(|effect| !env.content.effects.contains(&effect.id))
    {
        return Err(AbilityError::UnknownEffect {
            ability: def.id.clone(),
            effect: missing.id.clone(),
        });
    }

    let damage = def.damage.as_ref().map(|template| {
        let value = template.amount.resolve(caster.stats()).max(0.0);
        let mut group = DamageGroup::new([DamageSource::new(template.damage_type, value)
            .with_reaction(template.shield_reaction)])
        .with_method(template.method)
        .with_chance(template.chance)
        .with_penetration(template.penetration);
        group.use_dodge = template.use_dodge;
        group
    });
    let heal = def.heal.as_ref().map(|template| {
        HealGroup::single(
            template.heal_type,
            template.amount.resolve(caster.stats()).max(0.0),
        )
    });
    let vamp = caster.stat(StatKind::Vamp);
    let siphon = caster.stat(StatKind::Siphon);

    let ult_cost = ult_target as u32;
    let record = caster.record_mut();
    if def.ultimate {
        record.vitals.ult_stacks = record.vitals.ult_stacks.saturating_sub(ult_cost);
    } else if let Some(index) = record.inventory.hand.iter().position(|id| *id == def.id) {
        record.inventory.hand.remove(index);
    }
    record.vitals.action_points -= def.ap_cost;
    record.vitals.mana -= def.mana_cost;
    record.vitals.heat += def.heat;

    Ok(Cast {
        caster: caster.id().to_owned(),
        ability: Some(def.id.clone()),
        target_self: matches!(def.target, AbilityTarget::SelfOnly),
        damage,
        heal,
        effects: def.effects.clone(),
        vamp,
        siphon,
    })
}

impl Cast {
    /// Applies damage, then healing, then effects to `target`. Effects only
    /// land when the damage roll (if any) succeeded.
    pub fn resolve(self, target: &mut Creature, env: &Env<'_>, dice: &mut impl Dice) -> CastReport {
        let to = Some(target.id().to_owned());
        let cause = self
            .ability
            .clone()
            .unwrap_or_else(|| "attack".to_owned());
        let from = Some(self.caster.clone());

        let damage = self.damage.map(|group| {
            let group = group.attributed(from.clone(), to.clone(), cause.clone());
            resolve_damage(target, group, env.config, dice)
        });
        let landed = damage.as_ref().is_none_or(|log| log.successful);

        let heal = self
            .heal
            .filter(|_| landed)
            .map(|group| apply_heal(target, group.attributed(from.clone(), to.clone(), cause.clone())));

        let mut effects = Vec::new();
        if landed {
            for application in &self.effects {
                // Ids were validated when the cast was prepared.
                if let Ok(events) = apply_effect(target, application, env, dice) {
                    effects.extend(events);
                }
            }
        }

        CastReport {
            caster: self.caster,
            target: target.id().to_owned(),
            ability: self.ability.clone(),
            damage,
            heal,
            effects,
            caster_heal: None,
            ult_stacks_gained: 0,
            rewards: Rewards {
                basic_attack: self.ability.is_none(),
                vamp: self.vamp,
                siphon: self.siphon,
            },
        }
    }
}

impl CastReport {
    /// Grants the caster its rewards for a landed hit: one ult stack for a
    /// basic attack, Vamp% of health damage as health and Siphon% of total
    /// damage as shield.
    pub fn settle(&mut self, caster: &mut Creature) {
        let Some(log) = self.damage.as_ref().filter(|log| log.successful) else {
            return;
        };

        if self.rewards.basic_attack {
            let target = caster.stat(StatKind::UltStackTarget).max(0.0) as u32;
            let vitals = caster.vitals_mut();
            let before = vitals.ult_stacks;
            vitals.ult_stacks = (before + 1).min(target.max(before));
            self.ult_stacks_gained = vitals.ult_stacks - before;
        }

        let vamp = log.totals.health * self.rewards.vamp.max(0.0) / 100.0;
        let siphon = log.totals.total * self.rewards.siphon.max(0.0) / 100.0;
        if vamp <= 0.0 && siphon <= 0.0 {
            return;
        }
        let group = HealGroup::new([
            HealSource::new(HealType::Health, vamp),
            HealSource::new(HealType::Shield, siphon),
        ])
        .attributed(
            Some(self.caster.clone()),
            Some(self.caster.clone()),
            "vamp",
        );
        self.caster_heal = Some(apply_heal(caster, group));
    }
}
