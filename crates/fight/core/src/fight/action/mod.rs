//! Actions a fighter can issue during its turn.
//!
//! An [`Action`] goes through three steps:
//! - `validate` checks it against the battle without mutating anything
//! - `start` rolls its outcome and produces an [`ActionResult`]
//! - the result is applied, immediately on failure or once its display
//!   duration has elapsed
mod cast;
mod movement;

use core::fmt;
use std::time::Duration;

pub use cast::CastAction;
pub use movement::MoveAction;

use crate::battle::Battle;
use crate::config::FightConfig;
use crate::env::{FightEnv, SpellLevel};
use crate::fight::{FightError, ValidationError};
use crate::fighter::FighterId;
use crate::grid::CellId;

/// Identifier of an action, unique inside one fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action:{}", self.0)
    }
}

/// A committed intention of one fighter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Cast(CastAction),
    Move(MoveAction),
    PassTurn { fighter: FighterId },
}

impl Action {
    pub fn fighter(&self) -> FighterId {
        match self {
            Self::Cast(cast) => cast.caster,
            Self::Move(movement) => movement.fighter,
            Self::PassTurn { fighter } => *fighter,
        }
    }

    pub fn validate(&self, battle: &Battle, env: &FightEnv<'_>) -> Result<(), FightError> {
        let fighter = battle
            .fighter(self.fighter())
            .ok_or(FightError::FighterNotFound(self.fighter()))?;
        if fighter.is_dead() {
            return Err(ValidationError::FighterDead(fighter.id()).into());
        }
        match self {
            Self::Cast(cast) => cast.validate(battle, env),
            Self::Move(movement) => movement.validate(battle),
            Self::PassTurn { .. } => Ok(()),
        }
    }

    /// Rolls the outcome of a validated action.
    pub fn start(&self, env: &FightEnv<'_>, config: &FightConfig) -> Result<ActionResult, FightError> {
        match self {
            Self::Cast(cast) => cast.start(env, config),
            Self::Move(movement) => Ok(movement.start(config)),
            Self::PassTurn { fighter } => Ok(ActionResult::Pass { fighter: *fighter }),
        }
    }
}

/// Outcome of a started action, applied later by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionResult {
    /// Normal or critical cast.
    Cast {
        caster: FighterId,
        level: SpellLevel,
        target: CellId,
        critical: bool,
        duration: Duration,
    },
    /// Critical failure: the AP cost is paid and nothing else happens.
    CastFailed {
        caster: FighterId,
        level: SpellLevel,
    },
    Move {
        fighter: FighterId,
        path: Vec<CellId>,
        duration: Duration,
    },
    Pass {
        fighter: FighterId,
    },
}

/// What the scheduler must do after a result was applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub end_turn: bool,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::CastFailed { .. })
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Cast { critical: true, .. })
    }

    /// Display duration before the result is applied.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Cast { duration, .. } | Self::Move { duration, .. } => *duration,
            Self::CastFailed { .. } | Self::Pass { .. } => Duration::ZERO,
        }
    }

    pub fn apply(&self, battle: &mut Battle, env: &FightEnv<'_>) -> Result<Applied, FightError> {
        match self {
            Self::Cast {
                caster,
                level,
                target,
                critical,
                ..
            } => cast::apply_cast(battle, env, *caster, level, *target, *critical),
            Self::CastFailed { caster, level } => {
                spend(battle, *caster, level.action_point_cost, 0)?;
                Ok(Applied {
                    end_turn: level.ends_turn_on_failure,
                })
            }
            Self::Move { fighter, path, .. } => {
                movement::apply_move(battle, *fighter, path)?;
                Ok(Applied::default())
            }
            Self::Pass { .. } => Ok(Applied { end_turn: true }),
        }
    }
}

/// Pays the cost of an action. Points can only vanish between validation and
/// application if the fight is corrupted.
fn spend(
    battle: &mut Battle,
    fighter: FighterId,
    action_points: i32,
    movement_points: i32,
) -> Result<(), FightError> {
    if battle.use_turn_points(fighter, action_points, movement_points) {
        Ok(())
    } else {
        Err(FightError::Inconsistent("turn points changed while an action was pending"))
    }
}
