use crate::effect::EffectError;
use crate::env::{OracleError, SpellRef};
use crate::error::{CombatError, ErrorSeverity};
use crate::fight::{FightState, TurnId};
use crate::fighter::{FighterId, StateId, TeamId};
use crate::grid::CellId;

/// An action, placement or registration is illegal in the current situation.
///
/// Rejected before any mutation; the caller may correct the request and retry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("not enough action points: {required} required, {available} available")]
    NotEnoughActionPoints { required: i32, available: i32 },

    #[error("not enough movement points: {required} required, {available} available")]
    NotEnoughMovementPoints { required: i32, available: i32 },

    #[error("target out of range: distance {distance} outside [{min}, {max}]")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("no line of sight to {0}")]
    NoLineOfSight(CellId),

    #[error("cell {0} is not free")]
    CellNotFree(CellId),

    #[error("cell {0} is outside the battlefield")]
    InvalidCell(CellId),

    #[error("state {0} is required")]
    RequiredState(StateId),

    #[error("state {0} forbids this spell")]
    ForbiddenState(StateId),

    #[error("path is empty or not contiguous")]
    InvalidPath,

    #[error("spell {} level {} is not known by the caster", .0.spell, .0.level)]
    SpellNotKnown(SpellRef),

    #[error("fighter {0} is dead")]
    FighterDead(FighterId),

    #[error("fighter {0} is ready and cannot move")]
    AlreadyReady(FighterId),

    #[error("unknown team {0}")]
    UnknownTeam(TeamId),

    #[error("team {0} is full")]
    TeamFull(TeamId),

    #[error("team {0} has no free starting cell")]
    NoFreePlace(TeamId),

    #[error("cell {0} is not a starting cell of the team")]
    InvalidPlace(CellId),

    #[error("a fight needs at least two teams with fighters")]
    NotEnoughTeams,

    #[error("no more teams can join this fight")]
    TooManyTeams,

    #[error("every fighter must be ready")]
    NotAllReady,
}

impl CombatError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughActionPoints { .. } => "VALIDATION_NOT_ENOUGH_AP",
            Self::NotEnoughMovementPoints { .. } => "VALIDATION_NOT_ENOUGH_MP",
            Self::OutOfRange { .. } => "VALIDATION_OUT_OF_RANGE",
            Self::NoLineOfSight(_) => "VALIDATION_NO_LINE_OF_SIGHT",
            Self::CellNotFree(_) => "VALIDATION_CELL_NOT_FREE",
            Self::InvalidCell(_) => "VALIDATION_INVALID_CELL",
            Self::RequiredState(_) => "VALIDATION_REQUIRED_STATE",
            Self::ForbiddenState(_) => "VALIDATION_FORBIDDEN_STATE",
            Self::InvalidPath => "VALIDATION_INVALID_PATH",
            Self::SpellNotKnown(_) => "VALIDATION_SPELL_NOT_KNOWN",
            Self::FighterDead(_) => "VALIDATION_FIGHTER_DEAD",
            Self::AlreadyReady(_) => "VALIDATION_ALREADY_READY",
            Self::UnknownTeam(_) => "VALIDATION_UNKNOWN_TEAM",
            Self::TeamFull(_) => "VALIDATION_TEAM_FULL",
            Self::NoFreePlace(_) => "VALIDATION_NO_FREE_PLACE",
            Self::InvalidPlace(_) => "VALIDATION_INVALID_PLACE",
            Self::NotEnoughTeams => "VALIDATION_NOT_ENOUGH_TEAMS",
            Self::TooManyTeams => "VALIDATION_TOO_MANY_TEAMS",
            Self::NotAllReady => "VALIDATION_NOT_ALL_READY",
        }
    }
}

/// Errors surfaced by fight operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FightError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{operation} is not allowed while the fight is {state}")]
    IllegalFightState {
        state: FightState,
        operation: &'static str,
    },

    #[error("it is not the turn of fighter {fighter}")]
    NotYourTurn { fighter: FighterId },

    #[error("an action is already in progress in turn {turn}")]
    ActionInProgress { turn: TurnId },

    #[error("fighter {0} not found")]
    FighterNotFound(FighterId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// An effect failed while a result was being applied.
    #[error("effect application failed: {0}")]
    Effect(#[from] EffectError),

    #[error("inconsistent fight: {0}")]
    Inconsistent(&'static str),
}

impl FightError {
    pub fn illegal_state(state: FightState, operation: &'static str) -> Self {
        Self::IllegalFightState { state, operation }
    }

    /// Errors after which the fight cannot be trusted anymore.
    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }
}

impl CombatError for FightError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(_) | Self::FighterNotFound(_) => ErrorSeverity::Validation,
            Self::IllegalFightState { .. }
            | Self::NotYourTurn { .. }
            | Self::ActionInProgress { .. } => ErrorSeverity::Recoverable,
            Self::Oracle(error) => error.severity(),
            Self::Effect(_) | Self::Inconsistent(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(error) => error.error_code(),
            Self::IllegalFightState { .. } => "FIGHT_ILLEGAL_STATE",
            Self::NotYourTurn { .. } => "FIGHT_NOT_YOUR_TURN",
            Self::ActionInProgress { .. } => "FIGHT_ACTION_IN_PROGRESS",
            Self::FighterNotFound(_) => "FIGHT_FIGHTER_NOT_FOUND",
            Self::Oracle(error) => error.error_code(),
            Self::Effect(_) => "FIGHT_EFFECT_FAILED",
            Self::Inconsistent(_) => "FIGHT_INCONSISTENT",
        }
    }
}
