//! Content validation errors.

use fight_core::{CombatError, ErrorSeverity, MonsterId, SpellId};

/// Definitions that are inconsistent on their own or with each other.
///
/// Raised once, at load time. A fight never starts on invalid content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("spell {spell} level {level} is defined twice")]
    DuplicateSpellLevel { spell: SpellId, level: u8 },

    #[error("spell {0} has no level")]
    NoSpellLevel(SpellId),

    #[error("spell {spell} level {level}: range [{min}, {max}] is empty")]
    InvalidRange {
        spell: SpellId,
        level: u8,
        min: u32,
        max: u32,
    },

    #[error("spell {spell} level {level}: negative action point cost {cost}")]
    NegativeCost { spell: SpellId, level: u8, cost: i32 },

    #[error("spell {spell} level {level}: chance {chance} outside [0, 100]")]
    InvalidChance { spell: SpellId, level: u8, chance: i32 },

    #[error("monster {monster} grade {grade} is defined twice")]
    DuplicateMonsterGrade { monster: MonsterId, grade: u8 },

    #[error("monster {monster} grade {grade}: life must be positive, got {life}")]
    InvalidLife {
        monster: MonsterId,
        grade: u8,
        life: i32,
    },

    #[error("spell {spell} summons unknown monster {monster} grade {grade}")]
    UnknownSummon {
        spell: SpellId,
        monster: MonsterId,
        grade: u8,
    },

    #[error("monster {monster} grade {grade} knows unknown spell {spell} level {level}")]
    UnknownMonsterSpell {
        monster: MonsterId,
        grade: u8,
        spell: SpellId,
        level: u8,
    },
}

impl CombatError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateSpellLevel { .. } => "CONTENT_DUPLICATE_SPELL_LEVEL",
            Self::NoSpellLevel(_) => "CONTENT_NO_SPELL_LEVEL",
            Self::InvalidRange { .. } => "CONTENT_INVALID_RANGE",
            Self::NegativeCost { .. } => "CONTENT_NEGATIVE_COST",
            Self::InvalidChance { .. } => "CONTENT_INVALID_CHANCE",
            Self::DuplicateMonsterGrade { .. } => "CONTENT_DUPLICATE_MONSTER_GRADE",
            Self::InvalidLife { .. } => "CONTENT_INVALID_LIFE",
            Self::UnknownSummon { .. } => "CONTENT_UNKNOWN_SUMMON",
            Self::UnknownMonsterSpell { .. } => "CONTENT_UNKNOWN_MONSTER_SPELL",
        }
    }
}
