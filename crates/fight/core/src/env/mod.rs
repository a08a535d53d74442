//! Traits describing read-only fight data.
//!
//! Oracles expose spell definitions, monster templates and randomness. The
//! [`Env`] aggregate bundles them so the rules can access everything they need
//! without hard coupling to concrete implementations. The battlefield grid is
//! owned by the fight itself (see [`crate::grid`]).
mod error;
mod monsters;
mod rng;
mod spells;

pub use error::OracleError;
pub use monsters::{CharacteristicValue, MonsterGrade, MonsterId, MonsterOracle, MonsterTemplate};
pub use rng::{PcgRng, RngOracle};
pub use spells::{Spell, SpellId, SpellLevel, SpellOracle, SpellRef};

/// Aggregates read-only oracles required by actions and effects.
pub struct Env<'a, S, M, R>
where
    S: SpellOracle + ?Sized,
    M: MonsterOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    spells: Option<&'a S>,
    monsters: Option<&'a M>,
    rng: Option<&'a R>,
}

impl<S, M, R> Clone for Env<'_, S, M, R>
where
    S: SpellOracle + ?Sized,
    M: MonsterOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, M, R> Copy for Env<'_, S, M, R>
where
    S: SpellOracle + ?Sized,
    M: MonsterOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type FightEnv<'a> = Env<'a, dyn SpellOracle + 'a, dyn MonsterOracle + 'a, dyn RngOracle + 'a>;

impl<'a, S, M, R> Env<'a, S, M, R>
where
    S: SpellOracle + ?Sized,
    M: MonsterOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(spells: Option<&'a S>, monsters: Option<&'a M>, rng: Option<&'a R>) -> Self {
        Self {
            spells,
            monsters,
            rng,
        }
    }

    pub fn with_all(spells: &'a S, monsters: &'a M, rng: &'a R) -> Self {
        Self::new(Some(spells), Some(monsters), Some(rng))
    }

    /// Returns the SpellOracle, or an error if not available.
    pub fn spells(&self) -> Result<&'a S, OracleError> {
        self.spells.ok_or(OracleError::SpellsNotAvailable)
    }

    /// Returns the MonsterOracle, or an error if not available.
    pub fn monsters(&self) -> Result<&'a M, OracleError> {
        self.monsters.ok_or(OracleError::MonstersNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Looks up a spell level, failing when the oracle or the definition is missing.
    pub fn spell(&self, spell: SpellId, level: u8) -> Result<&'a SpellLevel, OracleError> {
        self.spells()?
            .spell(spell, level)
            .ok_or(OracleError::SpellNotFound { spell, level })
    }

    /// Looks up a monster grade, failing when the oracle or the definition is missing.
    pub fn monster(&self, monster: MonsterId, grade: u8) -> Result<&'a MonsterGrade, OracleError> {
        self.monsters()?
            .monster(monster, grade)
            .ok_or(OracleError::MonsterNotFound { monster, grade })
    }
}

impl<'a, S, M, R> Env<'a, S, M, R>
where
    S: SpellOracle + 'a,
    M: MonsterOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based [`FightEnv`].
    pub fn into_fight_env(self) -> FightEnv<'a> {
        let spells: Option<&'a dyn SpellOracle> = self.spells.map(|spells| spells as _);
        let monsters: Option<&'a dyn MonsterOracle> = self.monsters.map(|monsters| monsters as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(spells, monsters, rng)
    }
}
