//! Apply, tick and clear active effects on a creature.
//!
//! ```text
//! Applying → Active → (Ticking)* → Expiring | Deleting → Removed
//! ```
//!
//! Each operation re-aggregates the creature before returning so effect
//! passives follow the new instance list.

use super::hooks::{EffectHooks, Impact};
use super::{EffectError, EffectEvent};
use crate::combat::{apply_heal, resolve_damage};
use crate::content::{EffectApplication, EffectDefinition, RemovalKind};
use crate::creature::{AppliedActiveEffect, Creature};
use crate::env::Env;
use crate::rng::Dice;

fn merged_ticks(old: i32, new: i32) -> i32 {
    if old == AppliedActiveEffect::PERSISTENT || new == AppliedActiveEffect::PERSISTENT {
        AppliedActiveEffect::PERSISTENT
    } else {
        new
    }
}

/// Resolves a hook impact against `target` and records the event.
fn fire(
    target: &mut Creature,
    id: &str,
    impact: Option<Impact>,
    env: &Env<'_>,
    dice: &mut impl Dice,
    events: &mut Vec<EffectEvent>,
) {
    let to = Some(target.id().to_owned());
    match impact {
        Some(Impact::Damage(group)) => {
            let group = group.attributed(None, to, id);
            let log = resolve_damage(target, group, env.config, dice);
            events.push(EffectEvent::Damaged {
                id: id.to_owned(),
                log,
            });
        }
        Some(Impact::Heal(group)) => {
            let group = group.attributed(None, to, id);
            let log = apply_heal(target, group);
            events.push(EffectEvent::Healed {
                id: id.to_owned(),
                log,
            });
        }
        None => {}
    }
}

/// Fires the removal hook of one instance. Instances whose definition has
/// been removed from content leave silently.
fn remove_instance(
    target: &mut Creature,
    instance: &AppliedActiveEffect,
    removal: RemovalKind,
    env: &Env<'_>,
    dice: &mut impl Dice,
    events: &mut Vec<EffectEvent>,
) {
    if let Some(def) = env.content.effects.get(&instance.id) {
        let impact = match removal {
            RemovalKind::Expire => def.kind.on_expire(instance.severity),
            RemovalKind::Delete => def.kind.on_delete(instance.severity),
        };
        fire(target, &instance.id, impact, env, dice, events);
    }
    let id = instance.id.clone();
    events.push(match removal {
        RemovalKind::Expire => EffectEvent::Expired { id },
        RemovalKind::Delete => EffectEvent::Deleted { id },
    });
}

fn remove_conflicts(
    target: &mut Creature,
    def: &EffectDefinition,
    env: &Env<'_>,
    dice: &mut impl Dice,
    events: &mut Vec<EffectEvent>,
) {
    let (conflicting, kept): (Vec<_>, Vec<_>) = target
        .active_effects()
        .iter()
        .cloned()
        .partition(|instance| {
            def.conflicts(&instance.id)
                || env
                    .content
                    .effects
                    .get(&instance.id)
                    .is_some_and(|other| other.conflicts(&def.id))
        });
    if conflicting.is_empty() {
        return;
    }

    *target.active_effects_mut() = kept;
    for instance in &conflicting {
        remove_instance(target, instance, def.conflict_removal, env, dice, events);
    }
}

/// Applies one effect instance. Conflicts are symmetric: an active instance
/// is removed when either definition lists the other.
///
/// Below the definition's `consecutive_limit` a new instance is pushed and
/// `on_apply` fires. At the limit the weakest instance (lowest severity,
/// oldest on ties) is refreshed: severity becomes the maximum of both, ticks
/// reset to the new value (persistent wins) and `on_apply` does not fire.
pub fn apply_effect(
    target: &mut Creature,
    application: &EffectApplication,
    env: &Env<'_>,
    dice: &mut impl Dice,
) -> Result<Vec<EffectEvent>, EffectError> {
    let def = env
        .content
        .effects
        .get(&application.id)
        .ok_or_else(|| EffectError::UnknownEffect(application.id.clone()))?;
    if application.ticks <= 0 && application.ticks != AppliedActiveEffect::PERSISTENT {
        return Err(EffectError::InvalidTicks {
            id: application.id.clone(),
            ticks: application.ticks,
        });
    }

    let mut events = Vec::new();
    remove_conflicts(target, def, env, dice, &mut events);

    let limit = def.consecutive_limit.max(1) as usize;
    let instances = target.active_effects_mut();
    let active = instances.iter().filter(|e| e.id == def.id).count();

    if active < limit {
        instances.push(AppliedActiveEffect {
            id: def.id.clone(),
            severity: application.severity,
            ticks: application.ticks,
        });
        events.push(EffectEvent::Applied {
            id: def.id.clone(),
            severity: application.severity,
            ticks: application.ticks,
        });
        // Aggregate first so on_apply sees the capacity the instance grants.
        target.aggregate(env);
        let impact = def.kind.on_apply(application.severity);
        fire(target, &def.id, impact, env, dice, &mut events);
    } else if let Some(weakest) = instances
        .iter_mut()
        .filter(|e| e.id == def.id)
        .reduce(|weakest, e| if e.severity < weakest.severity { e } else { weakest })
    {
        weakest.severity = weakest.severity.max(application.severity);
        weakest.ticks = merged_ticks(weakest.ticks, application.ticks);
        events.push(EffectEvent::Refreshed {
            id: def.id.clone(),
            severity: weakest.severity,
            ticks: weakest.ticks,
        });
    }

    target.aggregate(env);
    Ok(events)
}

/// Advances every ticking instance by one. Persistent instances are left
/// alone; instances reaching zero expire. A stored non-persistent instance
/// with no ticks left ticks once more and expires.
pub fn tick_effects(target: &mut Creature, env: &Env<'_>, dice: &mut impl Dice) -> Vec<EffectEvent> {
    let mut events = Vec::new();
    let instances = std::mem::take(target.active_effects_mut());
    let mut kept = Vec::with_capacity(instances.len());
    let mut expired = Vec::new();

    for mut instance in instances {
        if instance.is_persistent() {
            kept.push(instance);
            continue;
        }

        instance.ticks = (instance.ticks - 1).max(0);
        events.push(EffectEvent::Ticked {
            id: instance.id.clone(),
            remaining: instance.ticks,
        });
        if let Some(def) = env.content.effects.get(&instance.id) {
            let impact = def.kind.on_tick(instance.severity);
            fire(target, &instance.id, impact, env, dice, &mut events);
        }

        if instance.ticks == 0 {
            expired.push(instance);
        } else {
            kept.push(instance);
        }
    }

    *target.active_effects_mut() = kept;
    for instance in &expired {
        remove_instance(target, instance, RemovalKind::Expire, env, dice, &mut events);
    }

    target.aggregate(env);
    events
}

/// Removes every instance of `id`, firing `on_expire` or `on_delete`.
pub fn clear_effect(
    target: &mut Creature,
    id: &str,
    removal: RemovalKind,
    env: &Env<'_>,
    dice: &mut impl Dice,
) -> Result<Vec<EffectEvent>, EffectError> {
    if !env.content.effects.contains(id) {
        return Err(EffectError::UnknownEffect(id.to_owned()));
    }
    let (removed, kept): (Vec<_>, Vec<_>) = target
        .active_effects()
        .iter()
        .cloned()
        .partition(|instance| instance.id == id);
    if removed.is_empty() {
        return Err(EffectError::NotApplied(id.to_owned()));
    }

    *target.active_effects_mut() = kept;
    let mut events = Vec::new();
    for instance in &removed {
        remove_instance(target, instance, removal, env, dice, &mut events);
    }

    target.aggregate(env);
    Ok(events)
}
