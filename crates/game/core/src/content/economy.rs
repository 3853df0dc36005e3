//! Shops, loot tables and crafting schematics.

use std::collections::BTreeMap;

use super::defs::content_id;
use super::registry::{Content, ContentKind};
use crate::rng::Dice;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopEntry {
    pub item: String,
    /// Overrides the item's base value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopDef {
    pub id: String,
    pub name: String,
    pub stock: Vec<ShopEntry>,
    /// Fraction of item value paid when a creature sells to this shop.
    #[cfg_attr(feature = "serde", serde(default = "default_sell_ratio"))]
    pub sell_ratio: f64,
}

#[cfg(feature = "serde")]
fn default_sell_ratio() -> f64 {
    0.5
}

impl ShopDef {
    pub fn entry(&self, item: &str) -> Option<&ShopEntry> {
        self.stock.iter().find(|entry| entry.item == item)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: String,
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub min: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub max: u32,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTableDef {
    pub id: String,
    pub rolls: u32,
    pub entries: Vec<LootEntry>,
}

impl LootTableDef {
    /// Performs `rolls` weighted draws; each hit yields `min..=max` copies.
    pub fn roll(&self, dice: &mut impl Dice) -> Vec<String> {
        let total: u64 = self.entries.iter().map(|e| u64::from(e.weight)).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut drops = Vec::new();
        for _ in 0..self.rolls {
            let mut target = (dice.next_f64() * total as f64) as u64;
            let Some(entry) = self.entries.iter().find(|entry| {
                let weight = u64::from(entry.weight);
                if target < weight {
                    true
                } else {
                    target -= weight;
                    false
                }
            }) else {
                continue;
            };

            let count = dice.range(entry.min, entry.max.max(entry.min));
            drops.extend(std::iter::repeat_n(entry.item.clone(), count as usize));
        }
        drops
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchematicDef {
    pub id: String,
    pub name: String,
    /// Material id → required count.
    pub materials: BTreeMap<String, u32>,
    /// Item id placed in the backpack.
    pub output: String,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub count: u32,
}

content_id!(ShopDef, ContentKind::Shops);
content_id!(LootTableDef, ContentKind::LootTables);
content_id!(SchematicDef, ContentKind::Schematics);
