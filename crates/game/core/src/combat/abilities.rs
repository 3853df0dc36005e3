//! Deck and hand management.
//!
//! The deck is every non-ultimate ability granted by the creature's class and
//! equipped items. Each fight turn tops the hand up from the deck; ultimates
//! never enter the hand and unlock through ult stacks instead.

use crate::config::EngineConfig;
use crate::content::AbilityDef;
use crate::creature::Creature;
use crate::env::Env;
use crate::rng::Dice;
use crate::stats::StatKind;

/// Ability ids granted by class and equipped items, deduplicated in grant
/// order and resolved against the registry.
fn granted<'a>(creature: &Creature, env: &Env<'a>) -> Vec<&'a AbilityDef> {
    let content = env.content;
    let record = creature.record();

    let class = record
        .class
        .as_deref()
        .and_then(|id| content.classes.get(id))
        .map(|class| class.abilities.as_slice())
        .unwrap_or_default();
    let items = record
        .inventory
        .equipped
        .iter()
        .filter_map(|id| content.items.get(id))
        .flat_map(|item| item.abilities.iter());

    let mut seen: Vec<&'a AbilityDef> = Vec::new();
    for id in class.iter().chain(items) {
        if seen.iter().any(|ability| ability.id == *id) {
            continue;
        }
        if let Some(ability) = content.abilities.get(id) {
            seen.push(ability);
        }
    }
    seen
}

pub fn deck(creature: &Creature, env: &Env<'_>) -> Vec<String> {
    granted(creature, env)
        .into_iter()
        .filter(|ability| !ability.ultimate)
        .map(|ability| ability.id.clone())
        .collect()
}

/// Granted ultimates, or nothing while ult stacks are below target.
pub fn unlocked_ultimates(creature: &Creature, env: &Env<'_>) -> Vec<String> {
    let target = creature.stat(StatKind::UltStackTarget).max(0.0);
    if f64::from(creature.vitals().ult_stacks) < target {
        return Vec::new();
    }
    granted(creature, env)
        .into_iter()
        .filter(|ability| ability.ultimate)
        .map(|ability| ability.id.clone())
        .collect()
}

/// Drops hand entries no longer in the deck, then draws distinct deck entries
/// uniformly until the hand holds `min(HandSize, MAX_HAND_SIZE)` abilities.
/// Returns the ids drawn.
pub fn draw_hand(creature: &mut Creature, env: &Env<'_>, dice: &mut impl Dice) -> Vec<String> {
    let deck = deck(creature, env);
    let size = creature
        .stats()
        .get(StatKind::HandSize)
        .whole()
        .clamp(0, EngineConfig::MAX_HAND_SIZE as i64) as usize;

    let hand = &mut creature.record_mut().inventory.hand;
    hand.retain(|id| deck.contains(id));

    let mut candidates: Vec<String> = deck.into_iter().filter(|id| !hand.contains(id)).collect();
    let mut drawn = Vec::new();
    while hand.len() < size && !candidates.is_empty() {
        let pick = candidates.swap_remove(dice.pick(candidates.len()));
        drawn.push(pick.clone());
        hand.push(pick);
    }
    drawn
}

pub fn clear_hand(creature: &mut Creature) {
    creature.record_mut().inventory.hand.clear();
}
