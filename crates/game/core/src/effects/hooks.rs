//! Lifecycle hooks of the built-in effect behaviours.

use crate::combat::{DamageGroup, DamageSource, HealGroup, HealType, ShieldReaction};
use crate::content::EffectKind;

/// Vitals change requested by a hook; the lifecycle resolves it against the
/// affected creature.
#[derive(Clone, Debug, PartialEq)]
pub enum Impact {
    Damage(DamageGroup),
    Heal(HealGroup),
}

/// Fixed hook interface of an effect definition. Every hook defaults to a
/// no-op.
pub trait EffectHooks {
    fn on_apply(&self, _severity: u32) -> Option<Impact> {
        None
    }

    fn on_tick(&self, _severity: u32) -> Option<Impact> {
        None
    }

    fn on_expire(&self, _severity: u32) -> Option<Impact> {
        None
    }

    fn on_delete(&self, _severity: u32) -> Option<Impact> {
        None
    }
}

fn scaled(per_severity: f64, severity: u32) -> f64 {
    per_severity * f64::from(severity)
}

impl EffectHooks for EffectKind {
    fn on_apply(&self, severity: u32) -> Option<Impact> {
        match self {
            EffectKind::Barrier { per_severity } => Some(Impact::Heal(HealGroup::single(
                HealType::Shield,
                scaled(*per_severity, severity),
            ))),
            _ => None,
        }
    }

    fn on_tick(&self, severity: u32) -> Option<Impact> {
        match self {
            EffectKind::DamageOverTime {
                damage_type,
                per_severity,
                shield_reaction,
            } => Some(Impact::Damage(DamageGroup::new([DamageSource::new(
                *damage_type,
                scaled(*per_severity, severity),
            )
            .with_reaction(*shield_reaction)]))),
            EffectKind::HealOverTime {
                heal_type,
                per_severity,
            } => Some(Impact::Heal(HealGroup::single(
                *heal_type,
                scaled(*per_severity, severity),
            ))),
            _ => None,
        }
    }

    fn on_expire(&self, severity: u32) -> Option<Impact> {
        match self {
            EffectKind::Fuse {
                damage_type,
                per_severity,
            } => Some(Impact::Damage(DamageGroup::new([DamageSource::new(
                *damage_type,
                scaled(*per_severity, severity),
            )
            .with_reaction(ShieldReaction::Normal)]))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageType;

    #[test]
    fn damage_over_time_scales_with_severity() {
        let bleeding = EffectKind::DamageOverTime {
            damage_type: DamageType::True,
            per_severity: 1.0,
            shield_reaction: ShieldReaction::Ignore,
        };
        let Some(Impact::Damage(group)) = bleeding.on_tick(5) else {
            panic!("expected damage");
        };
        assert_eq!(group.sources.len(), 1);
        assert_eq!(group.sources[0].value, 5.0);
        assert_eq!(group.sources[0].shield_reaction, ShieldReaction::Ignore);
        assert_eq!(group.chance, 100.0);
        assert_eq!(bleeding.on_apply(5), None);
    }

    #[test]
    fn fuse_only_fires_on_expire() {
        let fuse = EffectKind::Fuse {
            damage_type: DamageType::Energy,
            per_severity: 10.0,
        };
        assert_eq!(fuse.on_tick(2), None);
        assert_eq!(fuse.on_delete(2), None);
        assert!(matches!(fuse.on_expire(2), Some(Impact::Damage(g)) if g.total() == 20.0));
    }
}
