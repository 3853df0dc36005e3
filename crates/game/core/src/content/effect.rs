//! Active effect definitions.

use super::defs::content_id;
use super::passive::{Passive, StatHooks};
use super::registry::{Content, ContentKind};
use crate::combat::{DamageType, HealType, ShieldReaction};

/// How an effect's severity is rendered next to its name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplaySeverity {
    #[default]
    None,
    Arabic,
    Roman,
}

impl DisplaySeverity {
    /// Label such as `Bleeding 3` or `Bleeding III`.
    pub fn label(self, name: &str, severity: u32) -> String {
        match self {
            DisplaySeverity::None => name.to_owned(),
            DisplaySeverity::Arabic => format!("{name} {severity}"),
            DisplaySeverity::Roman => format!("{name} {}", to_roman(severity)),
        }
    }
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Which terminal hook fires when an effect leaves a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalKind {
    /// Natural end; fires `on_expire`.
    Expire,
    /// Forced removal; fires `on_delete`.
    #[default]
    Delete,
}

/// Built-in lifecycle behaviour, chosen per definition at load time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Only passives; no lifecycle side effects.
    Passive,
    /// Deals `per_severity × severity` damage on every tick.
    DamageOverTime {
        damage_type: DamageType,
        per_severity: f64,
        shield_reaction: ShieldReaction,
    },
    /// Heals `per_severity × severity` on every tick.
    HealOverTime {
        heal_type: HealType,
        per_severity: f64,
    },
    /// Grants `per_severity × severity` shield when applied.
    Barrier { per_severity: f64 },
    /// Deals `per_severity × severity` damage when it expires; deleting it
    /// defuses it.
    Fuse {
        damage_type: DamageType,
        per_severity: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: String,
    pub name: String,
    pub kind: EffectKind,
    /// Maximum simultaneous instances of this id on one creature.
    #[cfg_attr(feature = "serde", serde(default = "default_limit"))]
    pub consecutive_limit: u32,
    /// Effect ids removed when this one is applied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicts_with: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflict_removal: RemovalKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_severity: DisplaySeverity,
    /// Scaled passives use the instance severity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<Passive>,
}

#[cfg(feature = "serde")]
fn default_limit() -> u32 {
    1
}

impl EffectDefinition {
    pub fn new(id: impl Into<String>, kind: EffectKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            consecutive_limit: 1,
            conflicts_with: Vec::new(),
            conflict_removal: RemovalKind::Delete,
            display_severity: DisplaySeverity::None,
            passives: Vec::new(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.consecutive_limit = limit;
        self
    }

    pub fn with_conflicts(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.conflicts_with = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_passives(mut self, passives: impl IntoIterator<Item = Passive>) -> Self {
        self.passives = passives.into_iter().collect();
        self
    }

    pub fn label(&self, severity: u32) -> String {
        self.display_severity.label(&self.name, severity)
    }

    pub fn conflicts(&self, other: &str) -> bool {
        self.conflicts_with.iter().any(|id| id == other)
    }
}

impl StatHooks for EffectDefinition {
    fn passives(&self) -> &[Passive] {
        &self.passives
    }
}

content_id!(EffectDefinition, ContentKind::Effects);

/// Request to apply an effect to a creature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectApplication {
    pub id: String,
    pub severity: u32,
    /// Remaining ticks; `-1` keeps the effect until removed explicitly.
    pub ticks: i32,
}

impl EffectApplication {
    pub fn new(id: impl Into<String>, severity: u32, ticks: i32) -> Self {
        Self {
            id: id.into(),
            severity,
            ticks,
        }
    }

    pub fn persistent(id: impl Into<String>, severity: u32) -> Self {
        Self::new(id, severity, -1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels() {
        let mut def = EffectDefinition::new("bleeding", EffectKind::Passive);
        def.name = "Bleeding".into();
        assert_eq!(def.label(4), "Bleeding");

        def.display_severity = DisplaySeverity::Arabic;
        assert_eq!(def.label(4), "Bleeding 4");

        def.display_severity = DisplaySeverity::Roman;
        assert_eq!(def.label(4), "Bleeding IV");
        assert_eq!(def.label(1994), "Bleeding MCMXCIV");
    }
}
