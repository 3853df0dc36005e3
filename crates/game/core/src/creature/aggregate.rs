//! Creature aggregation: rebuilds live stats from a record.
//!
//! # Source Order
//!
//! ```text
//! Directives → Species → Class (× level) → Equipped items → Carried items
//!     → Skills → Active effects (× severity, record order) → Perks
//! ```
//!
//! 1. Reset the stat sheet and restrictions (scratch buffer)
//! 2. `preload` every source in the order above
//! 3. Clamp vitals into `[0, derived max]`
//! 4. `postload` every source in the same order, then clamp again
//!
//! Ids that no longer resolve in the registry are skipped so old records stay
//! loadable after content removal.

use super::Creature;
use super::record::CreatureRecord;
use crate::content::{
    Carried, ClassDef, DirectiveDef, EffectDefinition, Equipped, Passive, PerkDef,
    PostloadContext, PreloadContext, SkillDef, SpeciesDef, StatHooks,
};
use crate::env::Env;
use crate::stats::{Restrictions, StatKind, StatSheet};

/// One resolved stat source, dispatched by variant.
enum Source<'a> {
    Directive(&'a DirectiveDef),
    Species(&'a SpeciesDef),
    Class(&'a ClassDef),
    Equipped(Equipped<'a>),
    Carried(Carried<'a>),
    Skill(&'a SkillDef),
    Effect(&'a EffectDefinition),
    Perk(&'a PerkDef),
}

impl StatHooks for Source<'_> {
    fn passives(&self) -> &[Passive] {
        match self {
            Source::Directive(def) => def.passives(),
            Source::Species(def) => def.passives(),
            Source::Class(def) => def.passives(),
            Source::Equipped(item) => item.passives(),
            Source::Carried(item) => item.passives(),
            Source::Skill(def) => def.passives(),
            Source::Effect(def) => def.passives(),
            Source::Perk(def) => def.passives(),
        }
    }
}

/// Resolves every source of `record` with its magnitude, in aggregation order.
fn collect_sources<'a>(record: &CreatureRecord, env: &Env<'a>) -> Vec<(Source<'a>, f64)> {
    let content = env.content;
    let mut sources: Vec<(Source<'a>, f64)> = Vec::new();

    sources.extend(env.directives().map(|d| (Source::Directive(d), 1.0)));

    if let Some(species) = record.species.as_deref().and_then(|id| content.species.get(id)) {
        sources.push((Source::Species(species), 1.0));
    }
    if let Some(class) = record.class.as_deref().and_then(|id| content.classes.get(id)) {
        sources.push((Source::Class(class), f64::from(record.progression.level)));
    }

    let inventory = &record.inventory;
    sources.extend(
        inventory
            .equipped
            .iter()
            .filter_map(|id| content.items.get(id))
            .map(|item| (Source::Equipped(item.equipped()), 1.0)),
    );
    sources.extend(
        inventory
            .backpack
            .iter()
            .filter_map(|id| content.items.get(id))
            .map(|item| (Source::Carried(item.carried()), 1.0)),
    );
    sources.extend(
        inventory
            .skills
            .iter()
            .filter_map(|id| content.skills.get(id))
            .map(|skill| (Source::Skill(skill), 1.0)),
    );
    sources.extend(record.active_effects.iter().filter_map(|applied| {
        content
            .effects
            .get(&applied.id)
            .map(|def| (Source::Effect(def), f64::from(applied.severity)))
    }));
    sources.extend(
        inventory
            .perks
            .iter()
            .filter_map(|id| content.perks.get(id))
            .map(|perk| (Source::Perk(perk), 1.0)),
    );

    sources
}

/// `value` bounded to `[0, max]`; a negative maximum yields zero.
pub(crate) fn bound(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

impl Creature {
    /// Rebuilds every derived stat from the record.
    ///
    /// Idempotent: running it twice on the same record yields the same sheet
    /// and vitals.
    pub fn aggregate(&mut self, env: &Env<'_>) {
        self.stats.reset();
        self.restrictions = Restrictions::empty();

        let sources = collect_sources(&self.record, env);

        for (source, severity) in &sources {
            source.preload(&mut PreloadContext {
                sheet: &mut self.stats,
                restrictions: &mut self.restrictions,
                severity: *severity,
            });
        }

        clamp_vitals(&mut self.record, &self.stats);

        for (source, severity) in &sources {
            source.postload(&mut PostloadContext {
                sheet: &mut self.stats,
                restrictions: &mut self.restrictions,
                vitals: &self.record.vitals,
                severity: *severity,
            });
        }

        clamp_vitals(&mut self.record, &self.stats);
    }
}

fn clamp_vitals(record: &mut CreatureRecord, stats: &StatSheet) {
    let max_health = stats.value(StatKind::MaxHealth);
    let vitals = &mut record.vitals;

    vitals.injuries = bound(vitals.injuries, max_health.max(0.0));
    vitals.health = bound(vitals.health, max_health - vitals.injuries);
    vitals.shield = bound(vitals.shield, stats.value(StatKind::Shield));
    vitals.mana = bound(vitals.mana, stats.value(StatKind::Mana));
    vitals.action_points = bound(vitals.action_points, stats.value(StatKind::ActionPoints));
    vitals.stress = bound(vitals.stress, stats.value(StatKind::MentalStrength));
    vitals.heat = bound(vitals.heat, stats.value(StatKind::HeatCapacity));
    vitals.ammo = bound(vitals.ammo, stats.value(StatKind::Ammo));

    let ult_target = stats.get(StatKind::UltStackTarget).whole().max(0) as u32;
    vitals.ult_stacks = vitals.ult_stacks.min(ult_target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::content::{
        ContentRegistry, EffectKind, ItemDef, Registry, Restriction,
    };
    use crate::creature::record::AppliedActiveEffect;
    use crate::stats::{ModifierKind, Restrictions};

    fn item(id: &str, passives: Vec<Passive>, carried: Vec<Passive>) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: id.into(),
            slot: None,
            value: 0,
            passives,
            carried_passives: carried,
            abilities: Vec::new(),
        }
    }

    fn content() -> ContentRegistry {
        ContentRegistry {
            species: Registry::from_entries([SpeciesDef {
                id: "android".into(),
                name: "Android".into(),
                passives: vec![Passive::AddBase {
                    stat: StatKind::Armor,
                    value: 10.0,
                }],
            }])
            .unwrap(),
            classes: Registry::from_entries([ClassDef {
                id: "vanguard".into(),
                name: "Vanguard".into(),
                passives: vec![Passive::scaled(StatKind::MaxHealth, ModifierKind::Add, 5.0)],
                abilities: Vec::new(),
            }])
            .unwrap(),
            items: Registry::from_entries([
                item(
                    "plating",
                    vec![Passive::modify(StatKind::Armor, ModifierKind::AddPercent, 0.5)],
                    vec![],
                ),
                item(
                    "charm",
                    vec![],
                    vec![Passive::modify(StatKind::Initiative, ModifierKind::Add, 2.0)],
                ),
            ])
            .unwrap(),
            effects: Registry::from_entries([EffectDefinition::new("stunned", EffectKind::Passive)
                .with_passives([
                    Passive::Restrict(Restriction::Attack),
                    Passive::scaled(StatKind::Parry, ModifierKind::Add, -1.0),
                ])])
            .unwrap(),
            directives: Registry::from_entries([DirectiveDef {
                id: "hardcore".into(),
                name: "Hardcore".into(),
                passives: vec![Passive::modify(StatKind::MaxHealth, ModifierKind::Multiply, 0.5)],
            }])
            .unwrap(),
            perks: Registry::from_entries([PerkDef {
                id: "last_stand".into(),
                name: "Last Stand".into(),
                passives: vec![Passive::WhenHealthBelow {
                    percent: 25.0,
                    then: Box::new(Passive::modify(StatKind::Melee, ModifierKind::Add, 15.0)),
                }],
            }])
            .unwrap(),
            ..ContentRegistry::default()
        }
    }

    fn record() -> CreatureRecord {
        let mut record = CreatureRecord::new("c1", "Vex")
            .with_species("android")
            .with_class("vanguard")
            .with_health(500.0);
        record.progression.level = 4;
        record.inventory.equipped = vec!["plating".into(), "missing_item".into()];
        record.inventory.backpack = vec!["charm".into(), "plating".into()];
        record.inventory.perks = vec!["last_stand".into()];
        record.active_effects = vec![AppliedActiveEffect {
            id: "stunned".into(),
            severity: 3,
            ticks: 2,
        }];
        record
    }

    #[test]
    fn sources_apply_in_order_and_stale_ids_are_skipped() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);

        let creature = Creature::load(record(), &env);

        // Species base shift + equipped percent of base: 10 + 0.5 × 10
        assert_eq!(creature.stat(StatKind::Armor), 15.0);
        // Class scales with level: 100 + 5 × 4; carried plating does nothing
        assert_eq!(creature.stat(StatKind::MaxHealth), 120.0);
        assert_eq!(creature.stat(StatKind::Initiative), 2.0);
        assert_eq!(creature.stat(StatKind::Parry), -3.0);
        assert!(creature.restrictions().contains(Restrictions::ATTACK));
        // Vitals clamped to derived max
        assert_eq!(creature.vitals().health, 120.0);
    }

    #[test]
    fn enabled_directives_apply_first() {
        let content = content();
        let config = EngineConfig::default().with_directives(["hardcore".to_owned()]);
        let env = Env::new(&content, &config);

        let creature = Creature::load(record(), &env);
        // (100 + 20) × 0.5
        assert_eq!(creature.stat(StatKind::MaxHealth), 60.0);
    }

    #[test]
    fn postload_sees_loaded_vitals() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);

        let healthy = Creature::load(record(), &env);
        assert_eq!(healthy.stat(StatKind::Melee), 10.0);

        let wounded = Creature::load(record().with_health(20.0), &env);
        assert_eq!(wounded.stat(StatKind::Melee), 25.0);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);

        let mut creature = Creature::load(record(), &env);
        let first: Vec<_> = creature.stats().values().collect();
        let first_vitals = creature.vitals().clone();

        creature.aggregate(&env);
        creature.aggregate(&env);

        let second: Vec<_> = creature.stats().values().collect();
        assert_eq!(first, second);
        assert_eq!(&first_vitals, creature.vitals());
    }

    #[test]
    fn negative_maximum_clamps_to_zero() {
        assert_eq!(bound(12.0, -4.0), 0.0);
        assert_eq!(bound(-3.0, 10.0), 0.0);
        assert_eq!(bound(7.0, 10.0), 7.0);
    }
}
