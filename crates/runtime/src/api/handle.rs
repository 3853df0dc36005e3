//! Cloneable façade for issuing commands to the runtime.
//!
//! Every command follows the same shape: take a content snapshot, fetch the
//! documents it touches, validate and mutate through fray-core, then persist.
//! Nothing is written when validation fails.

use std::sync::{Arc, Mutex, PoisonError};

use fray_core::{Creature, CreatureRecord, Env};

use super::errors::{Result, RuntimeError};
use crate::dice::RandDice;
use crate::oracle::ContentHandle;
use crate::repository::{Collection, FightCache, Store, load_document, save_document};

pub(crate) struct Shared {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) content: ContentHandle,
    pub(crate) fights: FightCache,
    pub(crate) dice: Mutex<RandDice>,
}

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    pub(crate) shared: Arc<Shared>,
}

impl RuntimeHandle {
    pub(crate) fn new(shared: Shared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.shared.store.as_ref()
    }

    pub fn content(&self) -> &ContentHandle {
        &self.shared.content
    }

    pub fn fight_cache(&self) -> &FightCache {
        &self.shared.fights
    }

    pub(crate) fn with_dice<R>(&self, f: impl FnOnce(&mut RandDice) -> R) -> R {
        let mut dice = self
            .shared
            .dice
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut dice)
    }

    pub(crate) async fn load_record(&self, id: &str) -> Result<CreatureRecord> {
        load_document(self.store(), Collection::Creatures, id)
            .await?
            .ok_or_else(|| RuntimeError::NotFound {
                collection: Collection::Creatures.as_str(),
                id: id.to_owned(),
            })
    }

    pub(crate) async fn save_record(&self, record: &CreatureRecord) -> Result<()> {
        save_document(self.store(), Collection::Creatures, record).await?;
        Ok(())
    }

    /// Fetches and aggregates a creature.
    pub(crate) async fn load_creature(&self, id: &str, env: &Env<'_>) -> Result<Creature> {
        let record = self.load_record(id).await?;
        Ok(Creature::load(record, env))
    }

    /// Re-aggregates and persists a creature.
    pub(crate) async fn save_creature(&self, creature: Creature, env: &Env<'_>) -> Result<()> {
        let record = creature.dump(env);
        self.save_record(&record).await
    }

    /// fetch → load → `f` → dump → put. `f` failing skips the write.
    pub(crate) async fn with_creature<R, F>(&self, id: &str, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce(&mut Creature, &Env<'_>, &mut RandDice) -> Result<R> + Send,
    {
        let snapshot = self.content().snapshot();
        let record = self.load_record(id).await?;

        let (record, output) = {
            let env = snapshot.env();
            let mut creature = Creature::load(record, &env);
            let output = self.with_dice(|dice| f(&mut creature, &env, dice))?;
            (creature.dump(&env), output)
        };

        self.save_record(&record).await?;
        Ok(output)
    }
}
