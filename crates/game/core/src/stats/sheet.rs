//! Per-pass scratch sheet holding one [`TrackableStat`] per [`StatKind`].

use bitflags::bitflags;
use strum::{EnumCount, IntoEnumIterator};

use super::kind::StatKind;
use super::trackable::{Modifier, TrackableStat};

/// All derived stats of a live creature.
///
/// The sheet is the aggregation scratch buffer: [`StatSheet::reset`] restores
/// every baseline and drops every modifier at the start of a pass, so nothing
/// pushed in a previous pass can leak into the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct StatSheet {
    stats: Vec<TrackableStat>,
}

impl StatSheet {
    pub fn new() -> Self {
        Self {
            stats: StatKind::iter()
                .map(|kind| TrackableStat::new(kind.baseline()))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        debug_assert_eq!(self.stats.len(), StatKind::COUNT);
        for (stat, kind) in self.stats.iter_mut().zip(StatKind::iter()) {
            stat.reset(kind.baseline());
        }
    }

    pub fn get(&self, kind: StatKind) -> &TrackableStat {
        &self.stats[kind.index()]
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut TrackableStat {
        &mut self.stats[kind.index()]
    }

    pub fn value(&self, kind: StatKind) -> f64 {
        self.get(kind).value()
    }

    pub fn push(&mut self, kind: StatKind, modifier: Modifier) {
        self.get_mut(kind).push(modifier);
    }

    pub fn add_base(&mut self, kind: StatKind, delta: f64) {
        self.get_mut(kind).add_base(delta);
    }

    /// Iterates `(kind, derived value)` pairs in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::iter().map(|kind| (kind, self.value(kind)))
    }
}

impl Default for StatSheet {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    /// Capabilities removed by passives (stuns, silences).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Restrictions: u8 {
        const ATTACK = 1 << 0;
        const ABILITIES = 1 << 1;
    }
}

bitflags! {
    /// Derived status flags of a live creature.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        /// Injuries have not consumed the whole health pool.
        const ALIVE = 1 << 0;
        /// Current health above zero.
        const UP = 1 << 1;
        const CAN_ATTACK = 1 << 2;
        const CAN_USE_ABILITIES = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sheet_starts_at_baselines() {
        let sheet = StatSheet::new();
        assert_eq!(sheet.value(StatKind::MaxHealth), 100.0);
        assert_eq!(sheet.value(StatKind::Armor), 0.0);
    }

    #[test]
    fn reset_restores_bases_and_clears_modifiers() {
        let mut sheet = StatSheet::new();
        sheet.add_base(StatKind::Armor, 15.0);
        sheet.push(StatKind::Melee, Modifier::multiply(3.0));

        sheet.reset();

        assert_eq!(sheet, StatSheet::new());
    }
}
