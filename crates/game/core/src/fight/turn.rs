//! Per-turn refresh applied when a creature's turn begins.

use crate::combat::{clear_hand, draw_hand};
use crate::creature::{Creature, bound};
use crate::env::Env;
use crate::rng::Dice;
use crate::stats::StatKind;

/// Refreshes resources for the start of a turn and tops up the hand.
/// Returns the ability ids drawn.
///
/// ```text
/// first turn:  AP, shield, ammo = max          intensity = 0
/// later turns: AP += ApRegen, shield += ShieldRegen, mana += ManaRegen,
///              ammo = max, heat −= Cooling     intensity += 1
/// ```
pub fn begin_turn(
    creature: &mut Creature,
    first_turn: bool,
    env: &Env<'_>,
    dice: &mut impl Dice,
) -> Vec<String> {
    let ap_max = creature.stat(StatKind::ActionPoints);
    let shield_max = creature.stat(StatKind::Shield);
    let mana_max = creature.stat(StatKind::Mana);
    let ammo_max = creature.stat(StatKind::Ammo).max(0.0);
    let heat_max = creature.stat(StatKind::HeatCapacity);
    let ap_regen = creature.stat(StatKind::ApRegen);
    let shield_regen = creature.stat(StatKind::ShieldRegen);
    let mana_regen = creature.stat(StatKind::ManaRegen);
    let cooling = creature.stat(StatKind::Cooling);

    let vitals = creature.vitals_mut();
    if first_turn {
        vitals.action_points = ap_max.max(0.0);
        vitals.shield = shield_max.max(0.0);
        vitals.ammo = ammo_max;
        vitals.intensity = 0;
    } else {
        vitals.action_points = bound(vitals.action_points + ap_regen, ap_max);
        vitals.shield = bound(vitals.shield + shield_regen, shield_max);
        vitals.mana = bound(vitals.mana + mana_regen, mana_max);
        vitals.ammo = ammo_max;
        vitals.heat = bound(vitals.heat - cooling, heat_max);
        vitals.intensity = vitals.intensity.saturating_add(1);
    }

    draw_hand(creature, env, dice)
}

/// Clears fight-only state when a creature leaves a fight.
pub fn leave_fight(creature: &mut Creature) {
    clear_hand(creature);
    creature.vitals_mut().intensity = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::content::ContentRegistry;
    use crate::creature::CreatureRecord;
    use crate::rng::ScriptedDice;

    #[test]
    fn first_and_later_turns_refresh_differently() {
        let content = ContentRegistry::default();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut dice = ScriptedDice::constant(0.0);

        let mut record = CreatureRecord::new("c1", "Ada").with_health(100.0);
        record.vitals.heat = 50.0;
        let mut creature = Creature::load(record, &env);

        begin_turn(&mut creature, true, &env, &mut dice);
        assert_eq!(creature.vitals().action_points, 6.0);
        assert_eq!(creature.vitals().ammo, 6.0);
        assert_eq!(creature.vitals().intensity, 0);

        creature.vitals_mut().action_points = 1.0;
        creature.vitals_mut().ammo = 0.0;
        begin_turn(&mut creature, false, &env, &mut dice);
        assert_eq!(creature.vitals().action_points, 5.0);
        assert_eq!(creature.vitals().ammo, 6.0);
        assert_eq!(creature.vitals().heat, 40.0);
        assert_eq!(creature.vitals().intensity, 1);

        leave_fight(&mut creature);
        assert_eq!(creature.vitals().intensity, 0);
    }
}
