//! Damage resolution.
//!
//! # Formula
//!
//! ```text
//! chance      = clamp(chance − dodge, 0, 100)      dodge: Parry | Deflect | 0
//! protection  = Armor − lethality  (Physical)
//!             = Filter − cutting   (Energy)
//! final       = value × 100 / (100 + max(0, protection)) × (1 + Vulnerability / 100)
//! injuries   += health × injury_ratio × 100 / (100 + max(0, Tenacity))
//! stress     += health × stress_ratio × 100 / (100 + max(0, StressResistance))
//! ```
//!
//! True and Stress sources skip protection and vulnerability.

use super::{
    DamageGroup, DamageLog, DamageMethod, DamageSource, DamageTotals, DamageType, ShieldReaction,
};
use crate::config::EngineConfig;
use crate::creature::{Creature, bound};
use crate::rng::Dice;
use crate::stats::StatKind;

/// `100 / (100 + max(0, protection))`.
pub fn protection_multiplier(protection: f64) -> f64 {
    100.0 / (100.0 + protection.max(0.0))
}

fn dodge(target: &Creature, method: DamageMethod) -> f64 {
    match method {
        DamageMethod::Direct => 0.0,
        DamageMethod::Melee => target.stat(StatKind::Parry),
        DamageMethod::Ranged => target.stat(StatKind::Deflect),
    }
}

fn mitigate(target: &Creature, group: &DamageGroup, source: &DamageSource) -> f64 {
    let value = source.value.max(0.0);
    let vulnerability = (1.0 + target.stat(StatKind::Vulnerability) / 100.0).max(0.0);
    match source.damage_type {
        DamageType::True | DamageType::Stress => value,
        DamageType::Physical => {
            let armor = target.stat(StatKind::Armor) - group.penetration.lethality;
            value * protection_multiplier(armor) * vulnerability
        }
        DamageType::Energy => {
            let filter = target.stat(StatKind::Filter) - group.penetration.cutting;
            value * protection_multiplier(filter) * vulnerability
        }
    }
}

/// Rolls, mitigates and applies `group` to `target`.
///
/// A failed roll is not an error: the log reports `successful == false` with
/// zero totals and the target is untouched.
pub fn resolve_damage(
    target: &mut Creature,
    group: DamageGroup,
    config: &EngineConfig,
    dice: &mut impl Dice,
) -> DamageLog {
    let dodge = if group.use_dodge {
        dodge(target, group.method)
    } else {
        0.0
    };
    let chance = (group.chance - dodge).clamp(0.0, 100.0);

    let successful = if chance >= 100.0 {
        true
    } else if chance <= 0.0 {
        false
    } else {
        dice.roll_percent() < chance
    };

    let mut final_group = group.clone();
    if !successful {
        for source in &mut final_group.sources {
            source.value = 0.0;
        }
        return DamageLog {
            successful,
            chance,
            original: group,
            final_group,
            totals: DamageTotals::default(),
        };
    }

    for (source, original) in final_group.sources.iter_mut().zip(&group.sources) {
        source.value = mitigate(target, &group, original);
    }

    let passthrough = (group.penetration.passthrough / 100.0).clamp(0.0, 1.0);
    let tenacity = protection_multiplier(target.stat(StatKind::Tenacity));
    let composure = protection_multiplier(target.stat(StatKind::StressResistance));
    let max_health = target.max_health();
    let mental_strength = target.stat(StatKind::MentalStrength);

    let mut totals = DamageTotals::default();
    let vitals = target.vitals_mut();

    for source in &mut final_group.sources {
        let amount = source.value;

        if !source.damage_type.hits_health() {
            *totals.by_type.entry(source.damage_type).or_default() += amount;
            totals.total += amount;
            let before = vitals.stress;
            vitals.stress = bound(vitals.stress + amount, mental_strength);
            totals.stress += vitals.stress - before;
            continue;
        }

        let (to_shield, to_health) = match source.shield_reaction {
            ShieldReaction::Ignore => (0.0, amount),
            ShieldReaction::Only => (amount.min(vitals.shield.max(0.0)), 0.0),
            ShieldReaction::Normal => {
                let bypass = amount * passthrough;
                let absorbed = (amount - bypass).min(vitals.shield.max(0.0));
                (absorbed, amount - absorbed)
            }
        };
        // Shield-only overflow is dropped and never counts as dealt.
        source.value = to_shield + to_health;
        *totals.by_type.entry(source.damage_type).or_default() += source.value;
        totals.total += source.value;

        vitals.shield -= to_shield;
        totals.shield += to_shield;

        if to_health <= 0.0 {
            continue;
        }
        let injuries = to_health * config.damage_to_injury_ratio * tenacity;
        vitals.health = (vitals.health - to_health).max(0.0);
        vitals.injuries = bound(vitals.injuries + injuries, max_health.max(0.0));
        vitals.health = bound(vitals.health, max_health - vitals.injuries);
        totals.health += to_health;
        totals.injuries += injuries;

        let before = vitals.stress;
        vitals.stress = bound(
            vitals.stress + to_health * config.stress_from_health_ratio * composure,
            mental_strength,
        );
        totals.stress += vitals.stress - before;
    }

    totals.mitigated = group.total() - totals.total;

    DamageLog {
        successful,
        chance,
        original: group,
        final_group,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Penetration;
    use crate::content::ContentRegistry;
    use crate::creature::CreatureRecord;
    use crate::env::Env;
    use crate::rng::ScriptedDice;
    use crate::stats::{Modifier, StatKind};

    fn target(configure: impl FnOnce(&mut Creature)) -> Creature {
        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        let mut creature = Creature::load(
            CreatureRecord::new("t", "Target").with_health(100.0),
            &Env::new(&content, &config),
        );
        configure(&mut creature);
        creature
    }

    fn with_stat(kind: StatKind, value: f64) -> impl FnOnce(&mut Creature) {
        move |c: &mut Creature| c.stats_mut().push(kind, Modifier::add(value))
    }

    fn hit(creature: &mut Creature, group: DamageGroup) -> DamageLog {
        resolve_damage(
            creature,
            group,
            &EngineConfig::default(),
            &mut ScriptedDice::constant(0.5),
        )
    }

    #[test]
    fn physical_damage_against_armor_literals() {
        for (armor, health, injuries) in [
            (0.0, 50.0, 33.0),
            (28.0, 39.0625, 25.78125),
            (100.0, 25.0, 16.5),
        ] {
            let mut creature = target(with_stat(StatKind::Armor, armor));
            let log = hit(&mut creature, DamageGroup::single(DamageType::Physical, 50.0));

            assert!(log.successful);
            assert!((log.totals.health - health).abs() < 1e-9, "armor {armor}");
            assert!((log.totals.injuries - injuries).abs() < 1e-9, "armor {armor}");
            assert!((log.totals.mitigated - (50.0 - health)).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_chance_fails_without_roll() {
        let mut creature = target(|_| {});
        let log = hit(
            &mut creature,
            DamageGroup::single(DamageType::True, 30.0).with_chance(0.0),
        );
        assert!(!log.successful);
        assert_eq!(log.totals, DamageTotals::default());
        assert_eq!(creature.vitals().health, 100.0);
    }

    #[test]
    fn full_chance_always_succeeds() {
        let mut creature = target(|_| {});
        let log = resolve_damage(
            &mut creature,
            DamageGroup::single(DamageType::True, 30.0),
            &EngineConfig::default(),
            &mut ScriptedDice::constant(0.999),
        );
        assert!(log.successful);
        assert_eq!(creature.vitals().health, 70.0);
    }

    #[test]
    fn dodge_lowers_chance_by_method() {
        let mut creature = target(with_stat(StatKind::Parry, 30.0));
        let melee = DamageGroup::single(DamageType::True, 1.0)
            .with_method(DamageMethod::Melee)
            .with_chance(90.0)
            .dodgeable();
        assert_eq!(hit(&mut creature, melee.clone()).chance, 60.0);

        let ranged = melee.with_method(DamageMethod::Ranged);
        assert_eq!(hit(&mut creature, ranged).chance, 90.0);
    }

    #[test]
    fn shield_only_never_touches_health() {
        let mut creature = target(|_| {});
        creature.vitals_mut().shield = 20.0;

        let group = DamageGroup::new([
            DamageSource::new(DamageType::True, 50.0).with_reaction(ShieldReaction::Only)
        ]);
        let log = hit(&mut creature, group);

        assert_eq!(log.totals.shield, 20.0);
        assert_eq!(log.totals.health, 0.0);
        assert_eq!(creature.vitals().health, 100.0);
        assert_eq!(creature.vitals().shield, 0.0);
    }

    #[test]
    fn shield_only_overflow_is_not_counted_as_dealt() {
        let mut creature = target(|_| {});
        creature.vitals_mut().shield = 20.0;

        let group = DamageGroup::new([
            DamageSource::new(DamageType::True, 50.0).with_reaction(ShieldReaction::Only)
        ]);
        let log = hit(&mut creature, group);

        assert_eq!(log.totals.total, 20.0);
        assert_eq!(log.totals.by_type.get(&DamageType::True), Some(&20.0));
        assert_eq!(log.final_group.sources[0].value, 20.0);
        assert_eq!(log.totals.mitigated, 30.0);
    }

    #[test]
    fn ignore_reaction_leaves_shield_alone() {
        let mut creature = target(|_| {});
        creature.vitals_mut().shield = 30.0;

        let group = DamageGroup::new([
            DamageSource::new(DamageType::True, 5.0).with_reaction(ShieldReaction::Ignore)
        ]);
        let log = hit(&mut creature, group);

        assert_eq!(log.totals.shield, 0.0);
        assert_eq!(creature.vitals().shield, 30.0);
        assert_eq!(creature.vitals().health, 95.0);
    }

    #[test]
    fn overkill_counts_as_health_damage() {
        let mut creature = target(|_| {});
        let log = hit(&mut creature, DamageGroup::single(DamageType::True, 150.0));

        assert_eq!(log.totals.health, 150.0);
        assert_eq!(log.totals.total, 150.0);
        assert_eq!(creature.vitals().health, 0.0);
    }

    #[test]
    fn normal_shield_absorbs_then_overflows_with_passthrough() {
        let mut creature = target(|_| {});
        creature.vitals_mut().shield = 10.0;

        let group = DamageGroup::single(DamageType::True, 40.0).with_penetration(Penetration {
            passthrough: 50.0,
            ..Penetration::default()
        });
        let log = hit(&mut creature, group);

        // 20 bypasses, 10 of the other 20 absorbed, 10 overflows.
        assert_eq!(log.totals.shield, 10.0);
        assert_eq!(log.totals.health, 30.0);
    }

    #[test]
    fn lethality_and_vulnerability_adjust_mitigation() {
        let mut creature = target(|c| {
            c.stats_mut().push(StatKind::Armor, Modifier::add(50.0));
            c.stats_mut().push(StatKind::Vulnerability, Modifier::add(50.0));
        });
        let group = DamageGroup::single(DamageType::Physical, 40.0).with_penetration(Penetration {
            lethality: 50.0,
            ..Penetration::default()
        });
        let log = hit(&mut creature, group);

        assert_eq!(log.totals.total, 60.0);
        assert_eq!(log.totals.mitigated, -20.0);
    }

    #[test]
    fn stress_sources_bypass_health() {
        let mut creature = target(|_| {});
        let log = hit(&mut creature, DamageGroup::single(DamageType::Stress, 15.0));

        assert_eq!(log.totals.stress, 15.0);
        assert_eq!(log.totals.health, 0.0);
        assert_eq!(creature.vitals().stress, 15.0);
    }

    #[test]
    fn health_damage_derives_stress() {
        let mut creature = target(|_| {});
        let log = hit(&mut creature, DamageGroup::single(DamageType::True, 40.0));
        assert_eq!(log.totals.stress, 10.0);
    }

    #[test]
    fn more_armor_never_means_more_damage() {
        let mut previous = f64::INFINITY;
        for armor in [-20.0, 0.0, 10.0, 50.0, 200.0, 1000.0] {
            let mut creature = target(with_stat(StatKind::Armor, armor));
            let log = hit(&mut creature, DamageGroup::single(DamageType::Physical, 80.0));
            assert!(log.totals.health <= previous);
            previous = log.totals.health;
        }
    }

    #[test]
    fn same_type_sources_share_a_bucket() {
        let mut creature = target(|_| {});
        let group = DamageGroup::new([
            DamageSource::new(DamageType::True, 5.0),
            DamageSource::new(DamageType::True, 0.0),
            DamageSource::new(DamageType::True, 7.0),
        ]);
        let log = hit(&mut creature, group);
        assert_eq!(log.totals.by_type.get(&DamageType::True), Some(&12.0));
        assert_eq!(log.totals.by_type.len(), 1);
    }
}
