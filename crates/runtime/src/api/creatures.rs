//! Creature commands: vitals, effects, inventory and progression.

use fray_core::content::{EffectApplication, RemovalKind};
use fray_core::{
    Creature, CreatureRecord, DamageGroup, DamageLog, EffectEvent, HealGroup, HealLog,
    apply_effect, apply_heal, clear_effect, resolve_damage,
};
use tracing::{debug, info};

use super::errors::{Result, RuntimeError, require_gm};
use super::handle::RuntimeHandle;
use crate::repository::{Collection, load_document};

impl RuntimeHandle {
    /// Persists a new creature with vitals filled to their maxima. NPCs
    /// require game-master permission.
    pub async fn create_creature(&self, gm: bool, record: CreatureRecord) -> Result<CreatureRecord> {
        if record.npc {
            require_gm(gm, "create npc")?;
        }
        let existing: Option<CreatureRecord> =
            load_document(self.store(), Collection::Creatures, &record.id).await?;
        if existing.is_some() {
            return Err(RuntimeError::AlreadyExists {
                collection: Collection::Creatures.as_str(),
                id: record.id,
            });
        }

        let snapshot = self.content().snapshot();
        let record = {
            let env = snapshot.env();
            let mut creature = Creature::load(record, &env);
            creature.restore();
            creature.dump(&env)
        };
        self.save_record(&record).await?;

        info!(target: "runtime::creatures", id = %record.id, npc = record.npc, "Creature created");
        Ok(record)
    }

    /// Fetches and aggregates a creature for display.
    pub async fn creature(&self, id: &str) -> Result<Creature> {
        let snapshot = self.content().snapshot();
        let env = snapshot.env();
        self.load_creature(id, &env).await
    }

    pub async fn delete_creature(&self, gm: bool, id: &str) -> Result<()> {
        require_gm(gm, "delete creature")?;
        self.load_record(id).await?;
        self.store().delete(Collection::Creatures, id).await?;
        info!(target: "runtime::creatures", id, "Creature deleted");
        Ok(())
    }

    pub async fn damage(&self, gm: bool, id: &str, group: DamageGroup) -> Result<DamageLog> {
        require_gm(gm, "damage")?;
        let log = self
            .with_creature(id, |creature, env, dice| {
                Ok(resolve_damage(creature, group, env.config, dice))
            })
            .await?;
        debug!(
            target: "runtime::creatures",
            id,
            successful = log.successful,
            health = log.totals.health,
            injuries = log.totals.injuries,
            "Damage resolved"
        );
        Ok(log)
    }

    pub async fn heal(&self, gm: bool, id: &str, group: HealGroup) -> Result<HealLog> {
        require_gm(gm, "heal")?;
        self.with_creature(id, |creature, _, _| Ok(apply_heal(creature, group)))
            .await
    }

    /// Fills health, shield, mana, action points and ammo.
    pub async fn rest(&self, gm: bool, id: &str) -> Result<()> {
        require_gm(gm, "rest")?;
        self.with_creature(id, |creature, _, _| {
            creature.restore();
            Ok(())
        })
        .await
    }

    pub async fn apply_effect(
        &self,
        gm: bool,
        id: &str,
        application: EffectApplication,
    ) -> Result<Vec<EffectEvent>> {
        require_gm(gm, "apply effect")?;
        self.with_creature(id, |creature, env, dice| {
            Ok(apply_effect(creature, &application, env, dice)?)
        })
        .await
    }

    pub async fn clear_effect(
        &self,
        gm: bool,
        id: &str,
        effect: &str,
        removal: RemovalKind,
    ) -> Result<Vec<EffectEvent>> {
        require_gm(gm, "clear effect")?;
        self.with_creature(id, |creature, env, dice| {
            Ok(clear_effect(creature, effect, removal, env, dice)?)
        })
        .await
    }

    /// One effect tick plus out-of-fight regeneration.
    pub async fn tick_creature(&self, gm: bool, id: &str) -> Result<Vec<EffectEvent>> {
        require_gm(gm, "tick")?;
        self.tick_one(id).await
    }

    pub(crate) async fn tick_one(&self, id: &str) -> Result<Vec<EffectEvent>> {
        self.with_creature(id, |creature, env, dice| {
            let events = fray_core::tick_effects(creature, env, dice);
            creature.regenerate();
            Ok(events)
        })
        .await
    }

    pub async fn equip(&self, id: &str, item: &str) -> Result<()> {
        self.with_creature(id, |creature, env, _| Ok(creature.equip(env, item)?))
            .await
    }

    pub async fn unequip(&self, id: &str, item: &str) -> Result<()> {
        self.with_creature(id, |creature, env, _| Ok(creature.unequip(env, item)?))
            .await
    }

    pub async fn give_item(&self, gm: bool, id: &str, item: &str) -> Result<()> {
        require_gm(gm, "give item")?;
        self.with_creature(id, |creature, env, _| Ok(creature.give_item(env, item)?))
            .await
    }

    pub async fn take_item(&self, gm: bool, id: &str, item: &str) -> Result<()> {
        require_gm(gm, "take item")?;
        self.with_creature(id, |creature, env, _| Ok(creature.take_item(env, item)?))
            .await
    }

    /// Buys one item; returns the price paid.
    pub async fn buy(&self, id: &str, shop: &str, item: &str) -> Result<u64> {
        self.with_creature(id, |creature, env, _| Ok(creature.buy(env, shop, item)?))
            .await
    }

    /// Sells one item; returns the payout.
    pub async fn sell(&self, id: &str, shop: &str, item: &str) -> Result<u64> {
        self.with_creature(id, |creature, env, _| Ok(creature.sell(env, shop, item)?))
            .await
    }

    pub async fn loot(&self, gm: bool, id: &str, table: &str) -> Result<Vec<String>> {
        require_gm(gm, "loot")?;
        self.with_creature(id, |creature, env, dice| Ok(creature.loot(env, table, dice)?))
            .await
    }

    pub async fn add_materials(&self, gm: bool, id: &str, material: &str, count: u32) -> Result<()> {
        require_gm(gm, "add materials")?;
        self.with_creature(id, |creature, _, _| {
            creature.add_materials(material, count);
            Ok(())
        })
        .await
    }

    pub async fn unlock_schematic(&self, gm: bool, id: &str, schematic: &str) -> Result<()> {
        require_gm(gm, "unlock schematic")?;
        self.with_creature(id, |creature, env, _| {
            Ok(creature.unlock_schematic(env, schematic)?)
        })
        .await
    }

    pub async fn craft(&self, id: &str, schematic: &str) -> Result<()> {
        self.with_creature(id, |creature, env, _| Ok(creature.craft(env, schematic)?))
            .await
    }

    /// Returns the number of levels gained.
    pub async fn grant_experience(&self, gm: bool, id: &str, amount: u64) -> Result<u32> {
        require_gm(gm, "grant experience")?;
        let gained = self
            .with_creature(id, |creature, env, _| {
                Ok(creature.grant_experience(env, amount))
            })
            .await?;
        if gained > 0 {
            info!(target: "runtime::creatures", id, gained, "Creature levelled up");
        }
        Ok(gained)
    }

    pub async fn travel(&self, id: &str, location: &str) -> Result<()> {
        self.with_creature(id, |creature, env, _| Ok(creature.travel(env, location)?))
            .await
    }
}
