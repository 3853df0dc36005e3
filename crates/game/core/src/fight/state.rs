use std::collections::VecDeque;

use super::roster::Roster;
use super::turn::{begin_turn, leave_fight};
use super::{FightError, FightOutcome, FightPhase, TurnSummary};
use crate::env::Env;
use crate::rng::Dice;
use crate::stats::StatKind;

/// Persisted fight state: parties, turn queue and round counter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fight {
    pub id: String,
    /// Creature ids per party.
    pub parties: Vec<Vec<String>>,
    /// Remaining actors of the current round, head acts next.
    pub queue: VecDeque<String>,
    pub round: u32,
    pub current: Option<String>,
    /// Creatures that already had their first turn.
    pub entered: Vec<String>,
    pub phase: FightPhase,
}

impl Fight {
    pub fn new(id: impl Into<String>, parties: Vec<Vec<String>>) -> Self {
        Self {
            id: id.into(),
            parties,
            queue: VecDeque::new(),
            round: 0,
            current: None,
            entered: Vec::new(),
            phase: FightPhase::Preparing,
        }
    }

    /// Every member id, deduplicated in party order.
    pub fn members(&self) -> Vec<String> {
        let mut members: Vec<String> = Vec::new();
        for id in self.parties.iter().flatten() {
            if !members.contains(id) {
                members.push(id.clone());
            }
        }
        members
    }

    pub fn party_of(&self, id: &str) -> Option<usize> {
        self.parties
            .iter()
            .position(|party| party.iter().any(|member| member == id))
    }

    /// Drops unresolvable members and empty parties, then builds the first
    /// queue. Fails with [`FightError::NotEnoughParties`] below two parties.
    pub fn prepare(
        &mut self,
        roster: &impl Roster,
        env: &Env<'_>,
        dice: &mut impl Dice,
    ) -> Result<(), FightError> {
        if self.phase != FightPhase::Preparing {
            return Err(FightError::WrongPhase {
                expected: FightPhase::Preparing,
                actual: self.phase,
            });
        }

        let parties: Vec<Vec<String>> = self
            .parties
            .iter()
            .map(|party| {
                party
                    .iter()
                    .filter(|id| roster.creature(id).is_some())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .filter(|party| !party.is_empty())
            .collect();
        if parties.len() < 2 {
            return Err(FightError::NotEnoughParties {
                found: parties.len(),
            });
        }

        self.parties = parties;
        self.construct_queue(roster, env, dice);
        self.round = 1;
        self.phase = FightPhase::Active;
        Ok(())
    }

    /// Rebuilds the queue: members deduplicated, sorted descending by
    /// `Initiative + jitter`.
    pub fn construct_queue(&mut self, roster: &impl Roster, env: &Env<'_>, dice: &mut impl Dice) {
        let half_width = env.config.initiative_jitter;
        let mut keyed: Vec<(f64, String)> = self
            .members()
            .into_iter()
            .map(|id| {
                let initiative = roster
                    .creature(&id)
                    .map(|c| c.stat(StatKind::Initiative))
                    .unwrap_or(f64::NEG_INFINITY);
                (initiative + dice.jitter(half_width), id)
            })
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.queue = keyed.into_iter().map(|(_, id)| id).collect();
    }

    /// Party indices that still have a member able to fight.
    fn standing_parties(&self, roster: &impl Roster) -> Vec<usize> {
        self.parties
            .iter()
            .enumerate()
            .filter(|(_, party)| party.iter().any(|id| roster.able_to_fight(id)))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn outcome(&self, roster: &impl Roster) -> FightOutcome {
        match self.standing_parties(roster).as_slice() {
            [] => FightOutcome::Draw,
            [winner] => FightOutcome::Winner(*winner),
            _ => FightOutcome::Continue,
        }
    }

    /// Pops the next able actor, rebuilding the queue (and starting a new
    /// round) whenever it runs dry, then refreshes that actor for its turn.
    ///
    /// Fails without mutation when nobody in any party can act.
    pub fn advance_turn(
        &mut self,
        roster: &mut impl Roster,
        env: &Env<'_>,
        dice: &mut impl Dice,
    ) -> Result<TurnSummary, FightError> {
        if self.phase != FightPhase::Active {
            return Err(FightError::WrongPhase {
                expected: FightPhase::Active,
                actual: self.phase,
            });
        }
        if self.standing_parties(&*roster).is_empty() {
            return Err(FightError::NoEligibleActor);
        }

        let mut skipped = Vec::new();
        let mut new_round = false;
        let actor = loop {
            let Some(id) = self.queue.pop_front() else {
                self.construct_queue(&*roster, env, dice);
                self.round += 1;
                new_round = true;
                continue;
            };
            if roster.able_to_fight(&id) {
                break id;
            }
            skipped.push(id);
        };

        let first_turn = !self.entered.contains(&actor);
        if first_turn {
            self.entered.push(actor.clone());
        }
        let drawn = match roster.creature_mut(&actor) {
            Some(creature) => begin_turn(creature, first_turn, env, dice),
            None => Vec::new(),
        };
        self.current = Some(actor.clone());

        Ok(TurnSummary {
            actor,
            skipped,
            round: self.round,
            new_round,
            drawn,
        })
    }

    /// Ends the fight: every member leaves (hand and intensity cleared) and
    /// the phase moves through Concluding to Ended.
    pub fn conclude(&mut self, roster: &mut impl Roster) -> FightOutcome {
        self.phase = FightPhase::Concluding;
        let outcome = self.outcome(&*roster);
        for id in self.members() {
            if let Some(creature) = roster.creature_mut(&id) {
                leave_fight(creature);
            }
        }
        self.queue.clear();
        self.current = None;
        self.phase = FightPhase::Ended;
        outcome
    }
}
