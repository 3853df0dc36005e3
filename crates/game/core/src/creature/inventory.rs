//! Inventory, economy, progression and travel commands.
//!
//! Every operation validates first and mutates only on success, then
//! re-aggregates so derived stats follow the new equipment.

use thiserror::Error;

use super::Creature;
use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::rng::Dice;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("item `{0}` is not in the backpack")]
    NotCarried(String),

    #[error("item `{0}` is not equipped")]
    NotEquipped(String),

    #[error("item `{0}` has no equipment slot")]
    NotEquippable(String),

    #[error("unknown shop `{0}`")]
    UnknownShop(String),

    #[error("shop `{shop}` does not stock `{item}`")]
    NotStocked { shop: String, item: String },

    #[error("price {price} exceeds available money {money}")]
    InsufficientFunds { price: u64, money: u64 },

    #[error("unknown loot table `{0}`")]
    UnknownLootTable(String),

    #[error("unknown schematic `{0}`")]
    UnknownSchematic(String),

    #[error("schematic `{0}` is not unlocked")]
    SchematicLocked(String),

    #[error("material `{material}` requires {needed}, have {have}")]
    MissingMaterials {
        material: String,
        needed: u32,
        have: u32,
    },

    #[error("unknown location `{0}`")]
    UnknownLocation(String),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "INVENTORY_UNKNOWN_ITEM",
            Self::NotCarried(_) => "INVENTORY_NOT_CARRIED",
            Self::NotEquipped(_) => "INVENTORY_NOT_EQUIPPED",
            Self::NotEquippable(_) => "INVENTORY_NOT_EQUIPPABLE",
            Self::UnknownShop(_) => "INVENTORY_UNKNOWN_SHOP",
            Self::NotStocked { .. } => "INVENTORY_NOT_STOCKED",
            Self::InsufficientFunds { .. } => "INVENTORY_INSUFFICIENT_FUNDS",
            Self::UnknownLootTable(_) => "INVENTORY_UNKNOWN_LOOT_TABLE",
            Self::UnknownSchematic(_) => "INVENTORY_UNKNOWN_SCHEMATIC",
            Self::SchematicLocked(_) => "INVENTORY_SCHEMATIC_LOCKED",
            Self::MissingMaterials { .. } => "INVENTORY_MISSING_MATERIALS",
            Self::UnknownLocation(_) => "INVENTORY_UNKNOWN_LOCATION",
        }
    }
}

fn position(list: &[String], id: &str) -> Option<usize> {
    list.iter().position(|entry| entry == id)
}

impl Creature {
    /// Moves an item from the backpack to its slot, displacing whatever
    /// occupied that slot back into the backpack.
    pub fn equip(&mut self, env: &Env<'_>, item: &str) -> Result<(), InventoryError> {
        let items = &env.content.items;
        let def = items
            .get(item)
            .ok_or_else(|| InventoryError::UnknownItem(item.to_owned()))?;
        let slot = def
            .slot
            .ok_or_else(|| InventoryError::NotEquippable(item.to_owned()))?;
        let carried = position(&self.record.inventory.backpack, item)
            .ok_or_else(|| InventoryError::NotCarried(item.to_owned()))?;

        let inventory = &mut self.record.inventory;
        inventory.backpack.remove(carried);
        if let Some(occupied) = inventory
            .equipped
            .iter()
            .position(|id| items.get(id).and_then(|d| d.slot) == Some(slot))
        {
            let displaced = inventory.equipped.remove(occupied);
            inventory.backpack.push(displaced);
        }
        inventory.equipped.push(item.to_owned());

        self.aggregate(env);
        Ok(())
    }

    pub fn unequip(&mut self, env: &Env<'_>, item: &str) -> Result<(), InventoryError> {
        let inventory = &mut self.record.inventory;
        let index = position(&inventory.equipped, item)
            .ok_or_else(|| InventoryError::NotEquipped(item.to_owned()))?;
        let removed = inventory.equipped.remove(index);
        inventory.backpack.push(removed);

        self.aggregate(env);
        Ok(())
    }

    pub fn give_item(&mut self, env: &Env<'_>, item: &str) -> Result<(), InventoryError> {
        if !env.content.items.contains(item) {
            return Err(InventoryError::UnknownItem(item.to_owned()));
        }
        self.record.inventory.backpack.push(item.to_owned());
        self.aggregate(env);
        Ok(())
    }

    /// Removes one carried copy of `item`.
    pub fn take_item(&mut self, env: &Env<'_>, item: &str) -> Result<(), InventoryError> {
        let inventory = &mut self.record.inventory;
        let index = position(&inventory.backpack, item)
            .ok_or_else(|| InventoryError::NotCarried(item.to_owned()))?;
        inventory.backpack.remove(index);

        self.aggregate(env);
        Ok(())
    }

    /// Buys one `item` from `shop`. Returns the price paid.
    pub fn buy(&mut self, env: &Env<'_>, shop: &str, item: &str) -> Result<u64, InventoryError> {
        let shop_def = env
            .content
            .shops
            .get(shop)
            .ok_or_else(|| InventoryError::UnknownShop(shop.to_owned()))?;
        let entry = shop_def.entry(item).ok_or_else(|| InventoryError::NotStocked {
            shop: shop.to_owned(),
            item: item.to_owned(),
        })?;
        let def = env
            .content
            .items
            .get(item)
            .ok_or_else(|| InventoryError::UnknownItem(item.to_owned()))?;

        let price = entry.price.unwrap_or(def.value);
        let money = self.record.inventory.money;
        if price > money {
            return Err(InventoryError::InsufficientFunds { price, money });
        }

        let inventory = &mut self.record.inventory;
        inventory.money = money - price;
        inventory.backpack.push(item.to_owned());

        self.aggregate(env);
        Ok(price)
    }

    /// Sells one carried `item` to `shop`. Returns the money received.
    pub fn sell(&mut self, env: &Env<'_>, shop: &str, item: &str) -> Result<u64, InventoryError> {
        let shop_def = env
            .content
            .shops
            .get(shop)
            .ok_or_else(|| InventoryError::UnknownShop(shop.to_owned()))?;
        let def = env
            .content
            .items
            .get(item)
            .ok_or_else(|| InventoryError::UnknownItem(item.to_owned()))?;
        let index = position(&self.record.inventory.backpack, item)
            .ok_or_else(|| InventoryError::NotCarried(item.to_owned()))?;

        let payout = (def.value as f64 * shop_def.sell_ratio.max(0.0)).floor() as u64;

        let inventory = &mut self.record.inventory;
        inventory.backpack.remove(index);
        inventory.money = inventory.money.saturating_add(payout);

        self.aggregate(env);
        Ok(payout)
    }

    /// Rolls a loot table into the backpack. Returns the dropped item ids.
    pub fn loot(
        &mut self,
        env: &Env<'_>,
        table: &str,
        dice: &mut impl Dice,
    ) -> Result<Vec<String>, InventoryError> {
        let table_def = env
            .content
            .loot_tables
            .get(table)
            .ok_or_else(|| InventoryError::UnknownLootTable(table.to_owned()))?;

        let drops = table_def.roll(dice);
        self.record.inventory.backpack.extend(drops.iter().cloned());

        self.aggregate(env);
        Ok(drops)
    }

    pub fn add_materials(&mut self, material: &str, count: u32) {
        let stock = self
            .record
            .inventory
            .materials
            .entry(material.to_owned())
            .or_default();
        *stock = stock.saturating_add(count);
    }

    pub fn unlock_schematic(&mut self, env: &Env<'_>, schematic: &str) -> Result<(), InventoryError> {
        if !env.content.schematics.contains(schematic) {
            return Err(InventoryError::UnknownSchematic(schematic.to_owned()));
        }
        let known = &mut self.record.inventory.schematics;
        if position(known, schematic).is_none() {
            known.push(schematic.to_owned());
        }
        Ok(())
    }

    /// Consumes materials and places the schematic output in the backpack.
    pub fn craft(&mut self, env: &Env<'_>, schematic: &str) -> Result<(), InventoryError> {
        let def = env
            .content
            .schematics
            .get(schematic)
            .ok_or_else(|| InventoryError::UnknownSchematic(schematic.to_owned()))?;
        if position(&self.record.inventory.schematics, schematic).is_none() {
            return Err(InventoryError::SchematicLocked(schematic.to_owned()));
        }

        let stock = &self.record.inventory.materials;
        for (material, &needed) in &def.materials {
            let have = stock.get(material).copied().unwrap_or(0);
            if have < needed {
                return Err(InventoryError::MissingMaterials {
                    material: material.clone(),
                    needed,
                    have,
                });
            }
        }

        let inventory = &mut self.record.inventory;
        for (material, &needed) in &def.materials {
            if let Some(have) = inventory.materials.get_mut(material) {
                *have = have.saturating_sub(needed);
            }
        }
        inventory.materials.retain(|_, count| *count > 0);
        inventory
            .backpack
            .extend(std::iter::repeat_n(def.output.clone(), def.count as usize));

        self.aggregate(env);
        Ok(())
    }

    /// Adds experience and levels up while the pool covers
    /// `xp_per_level × level`. Returns the number of levels gained.
    pub fn grant_experience(&mut self, env: &Env<'_>, amount: u64) -> u32 {
        let per_level = env.config.xp_per_level.max(1);
        let progression = &mut self.record.progression;
        progression.experience = progression.experience.saturating_add(amount);

        let mut gained = 0;
        loop {
            let cost = per_level.saturating_mul(u64::from(progression.level));
            if progression.experience < cost {
                break;
            }
            progression.experience -= cost;
            progression.level += 1;
            gained += 1;
        }

        if gained > 0 {
            self.aggregate(env);
        }
        gained
    }

    pub fn travel(&mut self, env: &Env<'_>, location: &str) -> Result<(), InventoryError> {
        if !env.content.locations.contains(location) {
            return Err(InventoryError::UnknownLocation(location.to_owned()));
        }
        self.record.location = Some(location.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::EngineConfig;
    use crate::content::{
        ContentRegistry, EquipSlot, ItemDef, LocationDef, Passive, Registry, SchematicDef,
        ShopDef, ShopEntry,
    };
    use crate::creature::CreatureRecord;
    use crate::stats::{ModifierKind, StatKind};

    fn weapon(id: &str, melee: f64, value: u64) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: id.into(),
            slot: Some(EquipSlot::Weapon),
            value,
            passives: vec![Passive::modify(StatKind::Melee, ModifierKind::Add, melee)],
            carried_passives: Vec::new(),
            abilities: Vec::new(),
        }
    }

    fn content() -> ContentRegistry {
        let mut scrap = weapon("scrap", 0.0, 3);
        scrap.slot = None;
        scrap.passives.clear();

        ContentRegistry {
            items: Registry::from_entries([
                weapon("knife", 4.0, 20),
                weapon("axe", 9.0, 60),
                scrap,
            ])
            .unwrap(),
            shops: Registry::from_entries([ShopDef {
                id: "bazaar".into(),
                name: "Bazaar".into(),
                stock: vec![
                    ShopEntry {
                        item: "axe".into(),
                        price: Some(50),
                    },
                    ShopEntry {
                        item: "knife".into(),
                        price: None,
                    },
                ],
                sell_ratio: 0.5,
            }])
            .unwrap(),
            schematics: Registry::from_entries([SchematicDef {
                id: "knife_recipe".into(),
                name: "Knife".into(),
                materials: BTreeMap::from([("iron".to_owned(), 2)]),
                output: "knife".into(),
                count: 1,
            }])
            .unwrap(),
            locations: Registry::from_entries([LocationDef {
                id: "outpost".into(),
                name: "Outpost".into(),
                shop: Some("bazaar".into()),
                loot_table: None,
            }])
            .unwrap(),
            ..ContentRegistry::default()
        }
    }

    fn creature(env: &Env<'_>) -> Creature {
        let mut record = CreatureRecord::new("c1", "Ada").with_health(100.0);
        record.inventory.backpack = vec!["knife".into(), "axe".into()];
        record.inventory.money = 55;
        Creature::load(record, env)
    }

    #[test]
    fn equip_displaces_same_slot() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);

        creature.equip(&env, "knife").unwrap();
        assert_eq!(creature.stat(StatKind::Melee), 14.0);

        creature.equip(&env, "axe").unwrap();
        let inventory = &creature.record().inventory;
        assert_eq!(inventory.equipped, vec!["axe"]);
        assert_eq!(inventory.backpack, vec!["knife"]);
        assert_eq!(creature.stat(StatKind::Melee), 19.0);

        creature.unequip(&env, "axe").unwrap();
        assert_eq!(creature.stat(StatKind::Melee), 10.0);
    }

    #[test]
    fn equip_rejects_without_mutation() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);
        let before = creature.record().clone();

        assert_eq!(
            creature.equip(&env, "scrap"),
            Err(InventoryError::NotEquippable("scrap".into()))
        );
        assert_eq!(
            creature.equip(&env, "sword"),
            Err(InventoryError::UnknownItem("sword".into()))
        );
        assert_eq!(creature.record(), &before);
    }

    #[test]
    fn buy_and_sell_move_money() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);

        assert_eq!(creature.buy(&env, "bazaar", "axe"), Ok(50));
        assert_eq!(creature.record().inventory.money, 5);
        assert_eq!(
            creature.buy(&env, "bazaar", "knife"),
            Err(InventoryError::InsufficientFunds { price: 20, money: 5 })
        );

        assert_eq!(creature.sell(&env, "bazaar", "axe"), Ok(30));
        assert_eq!(creature.record().inventory.money, 35);
    }

    #[test]
    fn crafting_consumes_materials() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);

        assert_eq!(
            creature.craft(&env, "knife_recipe"),
            Err(InventoryError::SchematicLocked("knife_recipe".into()))
        );
        creature.unlock_schematic(&env, "knife_recipe").unwrap();
        creature.add_materials("iron", 1);
        assert!(matches!(
            creature.craft(&env, "knife_recipe"),
            Err(InventoryError::MissingMaterials { needed: 2, have: 1, .. })
        ));

        creature.add_materials("iron", 1);
        creature.craft(&env, "knife_recipe").unwrap();
        let inventory = &creature.record().inventory;
        assert!(inventory.materials.is_empty());
        assert_eq!(inventory.backpack, vec!["knife", "axe", "knife"]);
    }

    #[test]
    fn experience_levels_up_progressively() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);

        // Level 1 → 2 costs 100, level 2 → 3 costs 200.
        assert_eq!(creature.grant_experience(&env, 350), 2);
        assert_eq!(creature.record().progression.level, 3);
        assert_eq!(creature.record().progression.experience, 50);
        assert_eq!(creature.grant_experience(&env, 10), 0);
    }

    #[test]
    fn travel_requires_known_location() {
        let content = content();
        let config = EngineConfig::default();
        let env = Env::new(&content, &config);
        let mut creature = creature(&env);

        assert!(creature.travel(&env, "moon").is_err());
        creature.travel(&env, "outpost").unwrap();
        assert_eq!(creature.record().location.as_deref(), Some("outpost"));
    }
}
