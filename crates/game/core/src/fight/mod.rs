//! Turn-based fights between parties of creatures.
//!
//! ```text
//! Preparing ──prepare──▶ Active ──conclude──▶ Concluding ──▶ Ended
//!                          │ ▲
//!                          └─┘ advance_turn (queue rebuilt per round)
//! ```
//!
//! The fight only stores ids. Live creatures are looked up through a
//! [`Roster`] supplied by the caller for each operation.

mod roster;
mod state;
mod turn;

use thiserror::Error;

pub use roster::Roster;
pub use state::Fight;
pub use turn::{begin_turn, leave_fight};

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FightPhase {
    Preparing,
    Active,
    Concluding,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightOutcome {
    /// Index of the only party with a member able to fight.
    Winner(usize),
    Draw,
    Continue,
}

/// Result of [`Fight::advance_turn`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSummary {
    pub actor: String,
    /// Members popped from the queue but unable to fight.
    pub skipped: Vec<String>,
    pub round: u32,
    pub new_round: bool,
    /// Abilities drawn into the actor's hand.
    pub drawn: Vec<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FightError {
    #[error("a fight needs at least two parties, found {found}")]
    NotEnoughParties { found: usize },

    #[error("no member of any party is able to act")]
    NoEligibleActor,

    #[error("fight is {actual}, expected {expected}")]
    WrongPhase {
        expected: FightPhase,
        actual: FightPhase,
    },

    #[error("it is not `{0}`'s turn")]
    NotCurrentActor(String),

    #[error("`{0}` is not part of this fight")]
    NotMember(String),
}

impl GameError for FightError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughParties { .. } | Self::NoEligibleActor => ErrorSeverity::Fatal,
            Self::WrongPhase { .. } | Self::NotCurrentActor(_) | Self::NotMember(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughParties { .. } => "FIGHT_NOT_ENOUGH_PARTIES",
            Self::NoEligibleActor => "FIGHT_NO_ELIGIBLE_ACTOR",
            Self::WrongPhase { .. } => "FIGHT_WRONG_PHASE",
            Self::NotCurrentActor(_) => "FIGHT_NOT_CURRENT_ACTOR",
            Self::NotMember(_) => "FIGHT_NOT_MEMBER",
        }
    }
}

impl Fight {
    /// Checks that `id` holds the current turn.
    pub fn ensure_current(&self, id: &str) -> Result<(), FightError> {
        if self.phase != FightPhase::Active {
            return Err(FightError::WrongPhase {
                expected: FightPhase::Active,
                actual: self.phase,
            });
        }
        if self.party_of(id).is_none() {
            return Err(FightError::NotMember(id.to_owned()));
        }
        match self.current.as_deref() {
            Some(current) if current == id => Ok(()),
            _ => Err(FightError::NotCurrentActor(id.to_owned())),
        }
    }
}
