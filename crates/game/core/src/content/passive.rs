//! Data-driven stat influence shared by every content kind.
//!
//! Content definitions do not carry callbacks. Each definition lists
//! [`Passive`]s, and the fixed [`StatHooks`] capability interface replays
//! them during aggregation:
//!
//! - `preload` runs before vitals exist and may shift bases or push modifiers
//! - `postload` runs after vitals are loaded and evaluates conditional passives

use crate::creature::Vitals;
use crate::stats::{Modifier, ModifierKind, Restrictions, StatKind, StatSheet};

/// Capability removed by a [`Passive::Restrict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restriction {
    Attack,
    Abilities,
}

impl Restriction {
    fn flag(self) -> Restrictions {
        match self {
            Restriction::Attack => Restrictions::ATTACK,
            Restriction::Abilities => Restrictions::ABILITIES,
        }
    }
}

/// One unit of stat influence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Passive {
    /// Push a fixed modifier.
    Modify {
        stat: StatKind,
        kind: ModifierKind,
        value: f64,
    },
    /// Push a modifier scaled by the source magnitude (effect severity,
    /// class level).
    Scaled {
        stat: StatKind,
        kind: ModifierKind,
        per_severity: f64,
    },
    /// Shift the stat base directly.
    AddBase { stat: StatKind, value: f64 },
    Restrict(Restriction),
    /// Applies `then` while health is below `percent` of effective maximum.
    WhenHealthBelow { percent: f64, then: Box<Passive> },
    /// Applies `then` while stress is above `percent` of mental strength.
    WhenStressAbove { percent: f64, then: Box<Passive> },
}

impl Passive {
    pub fn modify(stat: StatKind, kind: ModifierKind, value: f64) -> Self {
        Passive::Modify { stat, kind, value }
    }

    pub fn scaled(stat: StatKind, kind: ModifierKind, per_severity: f64) -> Self {
        Passive::Scaled {
            stat,
            kind,
            per_severity,
        }
    }

    fn is_conditional(&self) -> bool {
        matches!(
            self,
            Passive::WhenHealthBelow { .. } | Passive::WhenStressAbove { .. }
        )
    }

    /// Applies an unconditional passive. Conditional ones are ignored here.
    fn grant(&self, sheet: &mut StatSheet, restrictions: &mut Restrictions, severity: f64) {
        match self {
            Passive::Modify { stat, kind, value } => {
                sheet.push(*stat, Modifier::new(*kind, *value));
            }
            Passive::Scaled {
                stat,
                kind,
                per_severity,
            } => {
                sheet.push(*stat, Modifier::new(*kind, per_severity * severity));
            }
            Passive::AddBase { stat, value } => sheet.add_base(*stat, *value),
            Passive::Restrict(restriction) => restrictions.insert(restriction.flag()),
            Passive::WhenHealthBelow { .. } | Passive::WhenStressAbove { .. } => {}
        }
    }

    pub fn preload(&self, ctx: &mut PreloadContext<'_>) {
        self.grant(ctx.sheet, ctx.restrictions, ctx.severity);
    }

    pub fn postload(&self, ctx: &mut PostloadContext<'_>) {
        let (holds, then) = match self {
            Passive::WhenHealthBelow { percent, then } => {
                (ctx.health_percent() < *percent, then.as_ref())
            }
            Passive::WhenStressAbove { percent, then } => {
                (ctx.stress_percent() > *percent, then.as_ref())
            }
            _ => return,
        };

        if !holds {
            return;
        }
        if then.is_conditional() {
            then.postload(ctx);
        } else {
            then.grant(ctx.sheet, ctx.restrictions, ctx.severity);
        }
    }
}

/// State handed to `preload` hooks.
pub struct PreloadContext<'a> {
    pub sheet: &'a mut StatSheet,
    pub restrictions: &'a mut Restrictions,
    /// Magnitude of the source: effect severity, class level, or 1.
    pub severity: f64,
}

/// State handed to `postload` hooks once vitals are loaded.
pub struct PostloadContext<'a> {
    pub sheet: &'a mut StatSheet,
    pub restrictions: &'a mut Restrictions,
    pub vitals: &'a Vitals,
    pub severity: f64,
}

impl PostloadContext<'_> {
    fn health_percent(&self) -> f64 {
        let effective = (self.sheet.value(StatKind::MaxHealth) - self.vitals.injuries).max(0.0);
        if effective <= 0.0 {
            return 0.0;
        }
        self.vitals.health / effective * 100.0
    }

    fn stress_percent(&self) -> f64 {
        let ceiling = self.sheet.value(StatKind::MentalStrength);
        if ceiling <= 0.0 {
            return 100.0;
        }
        self.vitals.stress / ceiling * 100.0
    }
}

/// Fixed capability interface implemented by every stat-bearing content kind.
///
/// The defaults replay [`StatHooks::passives`]; kinds without passives keep
/// the no-op behaviour.
pub trait StatHooks {
    fn passives(&self) -> &[Passive] {
        &[]
    }

    fn preload(&self, ctx: &mut PreloadContext<'_>) {
        for passive in self.passives() {
            passive.preload(ctx);
        }
    }

    fn postload(&self, ctx: &mut PostloadContext<'_>) {
        for passive in self.passives() {
            passive.postload(ctx);
        }
    }
}
