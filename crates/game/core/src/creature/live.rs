use super::record::{AppliedActiveEffect, CreatureRecord, Vitals};
use crate::env::Env;
use crate::stats::{Restrictions, StatKind, StatSheet, StatusFlags};

/// A creature loaded for one request: its record plus the stat sheet rebuilt
/// from it.
///
/// Commands load a `Creature`, mutate it, and hand the record back with
/// [`Creature::dump`]. The sheet is never persisted.
#[derive(Clone, Debug)]
pub struct Creature {
    pub(super) record: CreatureRecord,
    pub(super) stats: StatSheet,
    pub(super) restrictions: Restrictions,
}

impl Creature {
    /// Loads a record and runs the first aggregation pass.
    pub fn load(record: CreatureRecord, env: &Env<'_>) -> Self {
        let mut creature = Self {
            record,
            stats: StatSheet::new(),
            restrictions: Restrictions::empty(),
        };
        creature.aggregate(env);
        creature
    }

    /// Re-aggregates and returns the record for persistence.
    pub fn dump(mut self, env: &Env<'_>) -> CreatureRecord {
        self.aggregate(env);
        self.record
    }

    /// Applies an arbitrary record edit, then re-aggregates.
    pub fn edit(&mut self, env: &Env<'_>, f: impl FnOnce(&mut CreatureRecord)) {
        f(&mut self.record);
        self.aggregate(env);
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn record(&self) -> &CreatureRecord {
        &self.record
    }

    pub fn stats(&self) -> &StatSheet {
        &self.stats
    }

    pub fn stat(&self, kind: StatKind) -> f64 {
        self.stats.value(kind)
    }

    /// Direct sheet access for tests; the next aggregation discards it.
    #[cfg(test)]
    pub(crate) fn stats_mut(&mut self) -> &mut StatSheet {
        &mut self.stats
    }

    pub fn restrictions(&self) -> Restrictions {
        self.restrictions
    }

    pub fn vitals(&self) -> &Vitals {
        &self.record.vitals
    }

    pub(crate) fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.record.vitals
    }

    pub fn active_effects(&self) -> &[AppliedActiveEffect] {
        &self.record.active_effects
    }

    pub(crate) fn active_effects_mut(&mut self) -> &mut Vec<AppliedActiveEffect> {
        &mut self.record.active_effects
    }

    pub(crate) fn record_mut(&mut self) -> &mut CreatureRecord {
        &mut self.record
    }

    pub fn max_health(&self) -> f64 {
        self.stat(StatKind::MaxHealth)
    }

    /// `max(0, MaxHealth − injuries)`.
    pub fn effective_max_health(&self) -> f64 {
        (self.max_health() - self.record.vitals.injuries).max(0.0)
    }

    pub fn is_alive(&self) -> bool {
        self.record.vitals.injuries < self.max_health()
    }

    pub fn is_up(&self) -> bool {
        self.record.vitals.health > 0.0
    }

    /// Alive and up; fights skip creatures that are not.
    pub fn able_to_fight(&self) -> bool {
        self.is_alive() && self.is_up()
    }

    pub fn flags(&self) -> StatusFlags {
        let mut flags = StatusFlags::empty();
        flags.set(StatusFlags::ALIVE, self.is_alive());
        flags.set(StatusFlags::UP, self.is_up());

        if self.able_to_fight() {
            flags.set(
                StatusFlags::CAN_ATTACK,
                !self.restrictions.contains(Restrictions::ATTACK),
            );
            flags.set(
                StatusFlags::CAN_USE_ABILITIES,
                !self.restrictions.contains(Restrictions::ABILITIES),
            );
        }
        flags
    }

    /// Fills health, shield, mana, action points and ammo to their maxima.
    /// Injuries and stress are untouched.
    pub fn restore(&mut self) {
        let health = self.effective_max_health();
        let shield = self.stat(StatKind::Shield).max(0.0);
        let mana = self.stat(StatKind::Mana).max(0.0);
        let action_points = self.stat(StatKind::ActionPoints).max(0.0);
        let ammo = self.stat(StatKind::Ammo).max(0.0);

        let vitals = self.vitals_mut();
        vitals.health = health;
        vitals.shield = shield;
        vitals.mana = mana;
        vitals.action_points = action_points;
        vitals.ammo = ammo;
    }

    /// Out-of-fight regeneration step: shield and mana recover by their
    /// regen stats.
    pub fn regenerate(&mut self) {
        let shield_cap = self.stat(StatKind::Shield);
        let shield_regen = self.stat(StatKind::ShieldRegen);
        let mana_cap = self.stat(StatKind::Mana);
        let mana_regen = self.stat(StatKind::ManaRegen);

        let vitals = self.vitals_mut();
        vitals.shield = super::aggregate::bound(vitals.shield + shield_regen, shield_cap);
        vitals.mana = super::aggregate::bound(vitals.mana + mana_regen, mana_cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::content::ContentRegistry;

    fn load(record: CreatureRecord) -> Creature {
        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        Creature::load(record, &Env::new(&content, &config))
    }

    #[test]
    fn restore_fills_to_effective_max() {
        let mut record = CreatureRecord::new("c1", "Ada");
        record.vitals.injuries = 30.0;
        let mut creature = load(record);

        creature.restore();
        assert_eq!(creature.vitals().health, 70.0);
        assert_eq!(creature.vitals().action_points, 6.0);
        assert_eq!(creature.vitals().ammo, 6.0);
        assert_eq!(creature.vitals().injuries, 30.0);
    }

    #[test]
    fn status_flags_follow_vitals() {
        let creature = load(CreatureRecord::new("c1", "Ada").with_health(40.0));
        assert_eq!(creature.flags(), StatusFlags::all());

        let downed = load(CreatureRecord::new("c2", "Bo"));
        assert!(downed.is_alive());
        assert!(!downed.is_up());
        assert_eq!(downed.flags(), StatusFlags::ALIVE);

        let mut record = CreatureRecord::new("c3", "Cy").with_health(10.0);
        record.vitals.injuries = 100.0;
        let dead = load(record);
        assert!(!dead.is_alive());
        assert!(!dead.able_to_fight());
        assert_eq!(dead.effective_max_health(), 0.0);
    }

    #[test]
    fn dump_returns_clamped_record() {
        let creature = load(CreatureRecord::new("c1", "Ada").with_health(250.0));
        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        let record = creature.dump(&Env::new(&content, &config));
        assert_eq!(record.vitals.health, 100.0);
    }
}
