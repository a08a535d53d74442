//! Oracle access errors.

use crate::env::{MonsterId, SpellId};
use crate::error::{CombatError, ErrorSeverity};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle means the environment was wired incorrectly; a missing
/// definition means a fighter or a cast refers to content that was never loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// SpellOracle is not available in the environment.
    #[error("SpellOracle not available")]
    SpellsNotAvailable,

    /// MonsterOracle is not available in the environment.
    #[error("MonsterOracle not available")]
    MonstersNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,

    /// Spell level definition was not found.
    #[error("spell {spell} level {level} not found")]
    SpellNotFound { spell: SpellId, level: u8 },

    /// Monster grade definition was not found.
    #[error("monster {monster} grade {grade} not found")]
    MonsterNotFound { monster: MonsterId, grade: u8 },
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            SpellsNotAvailable | MonstersNotAvailable | RngNotAvailable => ErrorSeverity::Fatal,
            SpellNotFound { .. } | MonsterNotFound { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            SpellsNotAvailable => "ORACLE_SPELLS_NOT_AVAILABLE",
            MonstersNotAvailable => "ORACLE_MONSTERS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            SpellNotFound { .. } => "ORACLE_SPELL_NOT_FOUND",
            MonsterNotFound { .. } => "ORACLE_MONSTER_NOT_FOUND",
        }
    }
}
