//! Oracle bundle shared by every fight of a service.

use std::sync::Arc;

use fight_content::{Content, MonsterCatalog, SpellBook};
use fight_core::{Env, FightEnv, MonsterOracle, PcgRng, RngOracle, SpellOracle};

/// Content and randomness behind cheap clones.
#[derive(Clone)]
pub struct ContentOracles {
    spells: Arc<SpellBook>,
    monsters: Arc<MonsterCatalog>,
    rng: Arc<dyn RngOracle>,
}

impl ContentOracles {
    pub fn new(spells: SpellBook, monsters: MonsterCatalog, rng: Arc<dyn RngOracle>) -> Self {
        Self {
            spells: Arc::new(spells),
            monsters: Arc::new(monsters),
            rng,
        }
    }

    /// Oracles over loaded content with a seeded generator.
    pub fn from_content(content: Content, seed: u64) -> Self {
        Self::new(content.spells, content.monsters, Arc::new(PcgRng::new(seed)))
    }

    pub fn spells(&self) -> &SpellBook {
        &self.spells
    }

    pub fn monsters(&self) -> &MonsterCatalog {
        &self.monsters
    }

    /// Borrows the bundle as the environment expected by the rules.
    pub fn as_fight_env(&self) -> FightEnv<'_> {
        let spells: &dyn SpellOracle = self.spells.as_ref();
        let monsters: &dyn MonsterOracle = self.monsters.as_ref();
        let rng: &dyn RngOracle = self.rng.as_ref();
        Env::with_all(spells, monsters, rng)
    }
}
