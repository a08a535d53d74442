use strum::Display;

use crate::env::OracleError;
use crate::error::{CombatError, ErrorSeverity};
use crate::fighter::FighterId;

/// The two ways an effect can be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPhase {
    /// Immediate application (effect without duration).
    #[strum(serialize = "handle")]
    Handle,
    /// Registration as a reversible buff (effect with a duration).
    #[strum(serialize = "buff")]
    Buff,
}

/// Errors raised while resolving an effect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// The handler does not implement the requested phase. The effect is skipped.
    #[error("{handler} does not support the {phase} phase")]
    UnsupportedOperation {
        handler: &'static str,
        phase: EffectPhase,
    },

    #[error("fighter {0} not found")]
    FighterNotFound(FighterId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl EffectError {
    pub fn unsupported(handler: &'static str, phase: EffectPhase) -> Self {
        Self::UnsupportedOperation { handler, phase }
    }
}

impl CombatError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedOperation { .. } | Self::FighterNotFound(_) => ErrorSeverity::Internal,
            Self::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation { .. } => "EFFECT_UNSUPPORTED_OPERATION",
            Self::FighterNotFound(_) => "EFFECT_FIGHTER_NOT_FOUND",
            Self::Oracle(error) => error.error_code(),
        }
    }
}
