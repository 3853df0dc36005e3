//! Fight commands. The fight document only holds ids; members are fetched
//! from the store for each command.

use std::collections::HashMap;

use fray_core::combat::{Cast, CastReport, prepare_attack, prepare_cast};
use fray_core::{Creature, DamageMethod, Env, Fight, FightOutcome, TurnSummary};
use tracing::{debug, info};

use super::errors::{Result, RuntimeError, require_gm};
use super::handle::RuntimeHandle;
use crate::repository::Collection;

/// Result of [`RuntimeHandle::next_turn`].
#[derive(Clone, Debug, PartialEq)]
pub enum FightProgress {
    Turn(TurnSummary),
    /// The fight had a winner (or nobody left) and has been removed.
    Concluded(FightOutcome),
}

impl RuntimeHandle {
    /// Creates and prepares a fight. Members missing from the store are
    /// dropped; fewer than two parties left is an error.
    pub async fn start_fight(
        &self,
        gm: bool,
        id: &str,
        parties: Vec<Vec<String>>,
    ) -> Result<Fight> {
        require_gm(gm, "start fight")?;
        if self.fight_cache().fetch(self.store(), id).await?.is_some() {
            return Err(RuntimeError::AlreadyExists {
                collection: Collection::Fights.as_str(),
                id: id.to_owned(),
            });
        }

        let snapshot = self.content().snapshot();
        let env = snapshot.env();
        let mut fight = Fight::new(id, parties);
        let roster = self.load_roster(&fight, &env).await?;
        self.with_dice(|dice| fight.prepare(&roster, &env, dice))?;

        self.fight_cache().put(self.store(), &fight).await?;
        info!(
            target: "runtime::fights",
            fight = id,
            parties = fight.parties.len(),
            queue = ?fight.queue,
            "Fight started"
        );
        Ok(fight)
    }

    /// Read-through lookup.
    pub async fn fight(&self, id: &str) -> Result<Fight> {
        self.fight_cache()
            .fetch(self.store(), id)
            .await?
            .ok_or_else(|| RuntimeError::NotFound {
                collection: Collection::Fights.as_str(),
                id: id.to_owned(),
            })
    }

    /// Ends the fight when a winner is decided, otherwise advances to the
    /// next able actor and refreshes it for its turn.
    pub async fn next_turn(&self, id: &str) -> Result<FightProgress> {
        let mut fight = self.fight(id).await?;
        let snapshot = self.content().snapshot();
        let env = snapshot.env();
        let mut roster = self.load_roster(&fight, &env).await?;

        match fight.outcome(&roster) {
            FightOutcome::Continue => {}
            decided => {
                self.finish(fight, roster, &env).await?;
                return Ok(FightProgress::Concluded(decided));
            }
        }

        let summary = self.with_dice(|dice| fight.advance_turn(&mut roster, &env, dice))?;
        if let Some(actor) = roster.remove(&summary.actor) {
            self.save_creature(actor, &env).await?;
        }
        self.fight_cache().put(self.store(), &fight).await?;

        debug!(
            target: "runtime::fights",
            fight = id,
            actor = %summary.actor,
            round = summary.round,
            skipped = summary.skipped.len(),
            "Turn advanced"
        );
        Ok(FightProgress::Turn(summary))
    }

    /// Basic attack by the current actor.
    pub async fn attack(
        &self,
        fight_id: &str,
        actor: &str,
        target: &str,
        method: DamageMethod,
    ) -> Result<CastReport> {
        self.perform(fight_id, actor, target, |caster, env| {
            Ok(prepare_attack(caster, method, env)?)
        })
        .await
    }

    /// Ability cast by the current actor. Self-only abilities ignore
    /// `target`.
    pub async fn cast(
        &self,
        fight_id: &str,
        actor: &str,
        ability: &str,
        target: &str,
    ) -> Result<CastReport> {
        self.perform(fight_id, actor, target, |caster, env| {
            Ok(prepare_cast(caster, ability, env)?)
        })
        .await
    }

    /// Concludes the fight now, whatever the outcome.
    pub async fn end_fight(&self, gm: bool, id: &str) -> Result<FightOutcome> {
        require_gm(gm, "end fight")?;
        let fight = self.fight(id).await?;
        let snapshot = self.content().snapshot();
        let env = snapshot.env();
        let roster = self.load_roster(&fight, &env).await?;
        self.finish(fight, roster, &env).await
    }

    /// Members that still resolve in the store, keyed by id.
    async fn load_roster(&self, fight: &Fight, env: &Env<'_>) -> Result<HashMap<String, Creature>> {
        let mut roster = HashMap::new();
        for id in fight.members() {
            match self.load_creature(&id, env).await {
                Ok(creature) => {
                    roster.insert(id, creature);
                }
                Err(RuntimeError::NotFound { .. }) => {
                    debug!(target: "runtime::fights", fight = %fight.id, member = %id, "Member missing from store");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(roster)
    }

    async fn finish(
        &self,
        mut fight: Fight,
        mut roster: HashMap<String, Creature>,
        env: &Env<'_>,
    ) -> Result<FightOutcome> {
        let outcome = fight.conclude(&mut roster);
        for (_, creature) in roster {
            self.save_creature(creature, env).await?;
        }
        self.fight_cache().remove(self.store(), &fight.id).await?;

        info!(target: "runtime::fights", fight = %fight.id, outcome = ?outcome, "Fight concluded");
        Ok(outcome)
    }

    /// Validates the turn, prepares the cast on the actor, resolves it on
    /// the target and settles rewards. Both creatures are written back only
    /// after everything succeeded.
    async fn perform<P>(
        &self,
        fight_id: &str,
        actor: &str,
        target: &str,
        prepare: P,
    ) -> Result<CastReport>
    where
        P: FnOnce(&mut Creature, &Env<'_>) -> Result<Cast> + Send,
    {
        let fight = self.fight(fight_id).await?;
        fight.ensure_current(actor)?;
        if fight.party_of(target).is_none() {
            return Err(RuntimeError::NotInFight {
                fight: fight.id.clone(),
                id: target.to_owned(),
            });
        }

        let snapshot = self.content().snapshot();
        let env = snapshot.env();
        let mut caster = self.load_creature(actor, &env).await?;
        let mut other = if target == actor {
            None
        } else {
            Some(self.load_creature(target, &env).await?)
        };

        let cast = prepare(&mut caster, &env)?;
        let on_self = cast.target_self || other.is_none();
        let report = self.with_dice(|dice| {
            let mut report = match other.as_mut() {
                Some(other) if !on_self => cast.resolve(other, &env, dice),
                _ => cast.resolve(&mut caster, &env, dice),
            };
            report.settle(&mut caster);
            report
        });

        self.save_creature(caster, &env).await?;
        if let Some(other) = other.filter(|_| !on_self) {
            self.save_creature(other, &env).await?;
        }

        debug!(
            target: "runtime::fights",
            fight = fight_id,
            caster = actor,
            defender = %report.target,
            ability = ?report.ability,
            "Cast resolved"
        );
        Ok(report)
    }
}
