//! Healing application.

use super::{HealGroup, HealLog, HealType};
use crate::creature::Creature;
use crate::stats::StatKind;

/// Raises `current` by `amount` up to `cap` without pulling an already
/// overcapped value down.
fn restore_toward(current: f64, amount: f64, cap: f64) -> f64 {
    if current >= cap {
        current
    } else {
        (current + amount).min(cap)
    }
}

/// Applies every source of `group` in order and reports what was applied.
pub fn apply_heal(target: &mut Creature, group: HealGroup) -> HealLog {
    let effective_max = target.effective_max_health();
    let shield_cap = target.stat(StatKind::Shield).max(0.0);
    let ap_cap = target.stat(StatKind::ActionPoints).max(0.0);

    let mut log = HealLog {
        requested: group.sources.iter().map(|s| s.value).sum(),
        applied: Default::default(),
        group,
    };

    let vitals = target.vitals_mut();
    for source in &log.group.sources {
        let amount = source.value.max(0.0);
        let applied = match source.heal_type {
            HealType::Health => {
                let before = vitals.health;
                vitals.health = restore_toward(before, amount, effective_max);
                vitals.health - before
            }
            HealType::Overheal => {
                vitals.health += amount;
                amount
            }
            HealType::Shield => {
                let before = vitals.shield;
                vitals.shield = restore_toward(before, amount, shield_cap);
                vitals.shield - before
            }
            HealType::ActionPoints => {
                let before = vitals.action_points;
                vitals.action_points = restore_toward(before, amount, ap_cap);
                vitals.action_points - before
            }
            HealType::Injuries => {
                let before = vitals.injuries;
                vitals.injuries = (before - amount).max(0.0);
                before - vitals.injuries
            }
            HealType::Stress => {
                let before = vitals.stress;
                vitals.stress = (before - amount).max(0.0);
                before - vitals.stress
            }
        };
        *log.applied.entry(source.heal_type).or_default() += applied;
    }

    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::HealSource;
    use crate::config::EngineConfig;
    use crate::content::ContentRegistry;
    use crate::creature::CreatureRecord;
    use crate::env::Env;
    use crate::stats::Modifier;

    fn wounded() -> Creature {
        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        let mut record = CreatureRecord::new("c1", "Ada").with_health(40.0);
        record.vitals.injuries = 20.0;
        record.vitals.stress = 5.0;
        Creature::load(record, &Env::new(&content, &config))
    }

    #[test]
    fn health_clamps_to_effective_max() {
        let mut creature = wounded();
        let log = apply_heal(&mut creature, HealGroup::single(HealType::Health, 100.0));

        assert_eq!(creature.vitals().health, 80.0);
        assert_eq!(log.applied(HealType::Health), 40.0);
        assert_eq!(log.requested, 100.0);
    }

    #[test]
    fn overheal_exceeds_until_aggregation() {
        let mut creature = wounded();
        apply_heal(&mut creature, HealGroup::single(HealType::Overheal, 60.0));
        assert_eq!(creature.vitals().health, 100.0);

        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        creature.aggregate(&Env::new(&content, &config));
        assert_eq!(creature.vitals().health, 80.0);
    }

    #[test]
    fn counters_never_go_negative() {
        let mut creature = wounded();
        let log = apply_heal(
            &mut creature,
            HealGroup::new([
                HealSource::new(HealType::Injuries, 50.0),
                HealSource::new(HealType::Stress, 2.0),
                HealSource::new(HealType::Stress, 10.0),
            ]),
        );

        assert_eq!(creature.vitals().injuries, 0.0);
        assert_eq!(creature.vitals().stress, 0.0);
        assert_eq!(log.applied(HealType::Injuries), 20.0);
        assert_eq!(log.applied(HealType::Stress), 5.0);
    }

    #[test]
    fn shield_and_action_points_clamp_to_their_stats() {
        let mut creature = wounded();
        creature.stats_mut().push(StatKind::Shield, Modifier::add(30.0));
        creature.vitals_mut().shield = 10.0;
        creature.vitals_mut().action_points = 2.0;

        let log = apply_heal(
            &mut creature,
            HealGroup::new([
                HealSource::new(HealType::Shield, 50.0),
                HealSource::new(HealType::ActionPoints, 10.0),
            ]),
        );

        assert_eq!(creature.vitals().shield, 30.0);
        assert_eq!(creature.vitals().action_points, 6.0);
        assert_eq!(log.applied(HealType::Shield), 20.0);
        assert_eq!(log.applied(HealType::ActionPoints), 4.0);
    }

    #[test]
    fn overcapped_values_are_not_pulled_down() {
        let mut creature = wounded();
        apply_heal(&mut creature, HealGroup::single(HealType::Overheal, 60.0));
        creature.vitals_mut().action_points = 9.0;

        let log = apply_heal(
            &mut creature,
            HealGroup::new([
                HealSource::new(HealType::Health, 5.0),
                HealSource::new(HealType::ActionPoints, 2.0),
            ]),
        );

        assert_eq!(creature.vitals().health, 100.0);
        assert_eq!(creature.vitals().action_points, 9.0);
        assert_eq!(log.applied(HealType::Health), 0.0);
        assert_eq!(log.applied(HealType::ActionPoints), 0.0);
    }
}
