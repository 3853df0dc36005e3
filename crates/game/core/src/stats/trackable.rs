//! Stacked-modifier scalar values.
//!
//! Every numeric creature attribute is a [`TrackableStat`]: a persisted `base`
//! plus a list of [`Modifier`]s that is rebuilt on every aggregation pass.
//!
//! The calculation stack is fixed:
//! `Add / AddPercent → Multiply → CapMax`
//!
//! Insertion order only matters between modifiers of the same group; the
//! groups themselves are always folded in the order above.

/// Application type of a single modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Flat additive bonus.
    Add,
    /// Fraction of `base` added on top (0.2 = +20% of base).
    AddPercent,
    /// Sequential multiplier applied after every additive modifier.
    Multiply,
    /// Ceiling applied last. Multiple caps resolve to the lowest.
    CapMax,
}

impl ModifierKind {
    /// Fold priority; additive kinds share the first group.
    const fn priority(self) -> u8 {
        match self {
            ModifierKind::Add | ModifierKind::AddPercent => 0,
            ModifierKind::Multiply => 1,
            ModifierKind::CapMax => 2,
        }
    }
}

/// A single modifier pushed onto a stat during aggregation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    pub value: f64,
}

impl Modifier {
    pub const fn new(kind: ModifierKind, value: f64) -> Self {
        Self { kind, value }
    }

    pub const fn add(value: f64) -> Self {
        Self::new(ModifierKind::Add, value)
    }

    pub const fn add_percent(fraction: f64) -> Self {
        Self::new(ModifierKind::AddPercent, fraction)
    }

    pub const fn multiply(factor: f64) -> Self {
        Self::new(ModifierKind::Multiply, factor)
    }

    pub const fn cap_max(ceiling: f64) -> Self {
        Self::new(ModifierKind::CapMax, ceiling)
    }
}

/// Base value plus an ordered modifier pipeline.
///
/// The derived value is never cached: [`TrackableStat::value`] folds the
/// modifiers on every call, so pushing a modifier is immediately visible.
///
/// # Example
/// ```
/// # use fray_core::stats::{Modifier, TrackableStat};
/// let mut stat = TrackableStat::new(10.0);
/// stat.push(Modifier::multiply(2.0));
/// stat.push(Modifier::add(5.0));
/// stat.push(Modifier::add_percent(0.5));
/// stat.push(Modifier::cap_max(35.0));
///
/// // min((10 + 5 + 0.5 × 10) × 2, 35)
/// assert_eq!(stat.value(), 35.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackableStat {
    base: f64,
    modifiers: Vec<Modifier>,
}

impl TrackableStat {
    pub const fn new(base: f64) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
    }

    /// Shift the base value. Used by preload hooks granting flat stats.
    pub fn add_base(&mut self, delta: f64) {
        self.base += delta;
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Drop every modifier and restore `base`.
    pub fn reset(&mut self, base: f64) {
        self.base = base;
        self.modifiers.clear();
    }

    /// Derived value.
    ///
    /// ```text
    /// additive   = base + Σ add + Σ (add_percent × base)
    /// multiplied = additive × Π multiply
    /// value      = min(multiplied, min(cap_max...))
    /// ```
    pub fn value(&self) -> f64 {
        // Stable sort keeps insertion order inside each priority group.
        let mut ordered: Vec<&Modifier> = self.modifiers.iter().collect();
        ordered.sort_by_key(|m| m.kind.priority());

        ordered.into_iter().fold(self.base, |acc, m| match m.kind {
            ModifierKind::Add => acc + m.value,
            ModifierKind::AddPercent => acc + m.value * self.base,
            ModifierKind::Multiply => acc * m.value,
            ModifierKind::CapMax => acc.min(m.value),
        })
    }

    /// Value rounded toward zero, for counters such as ammo or hand size.
    pub fn whole(&self) -> i64 {
        self.value().trunc() as i64
    }
}
