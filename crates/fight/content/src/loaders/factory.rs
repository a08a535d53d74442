//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use fight_core::FightConfig;
use tracing::info;

use crate::catalog::{MonsterCatalog, SpellBook, validate_references};
use crate::loaders::{ConfigLoader, LoadResult, MonsterLoader, SpellLoader};

/// Everything a fight needs from the data directory.
#[derive(Clone, Debug)]
pub struct Content {
    pub config: FightConfig,
    pub spells: SpellBook,
    pub monsters: MonsterCatalog,
}

/// Content factory that loads all fight content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells.ron
/// └── monsters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory on the data directory shipped with this crate, unless
    /// `CONTENT_DATA_DIR` points elsewhere.
    pub fn default_paths() -> Self {
        let data_dir = std::env::var("CONTENT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"));
        Self::new(data_dir)
    }

    /// Load fight configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<FightConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load and validate spells from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellBook> {
        let spells = SpellLoader::load(&self.data_dir.join("spells.ron"))?;
        Ok(SpellBook::from_spells(spells)?)
    }

    /// Load and validate monsters from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        let monsters = MonsterLoader::load(&self.data_dir.join("monsters.ron"))?;
        Ok(MonsterCatalog::from_templates(monsters)?)
    }

    /// Loads every file and checks the references between spells and monsters.
    pub fn load_all(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let spells = self.load_spells()?;
        let monsters = self.load_monsters()?;
        validate_references(&spells, &monsters)?;

        info!(
            data_dir = %self.data_dir.display(),
            spells = spells.len(),
            monsters = monsters.len(),
            "content loaded"
        );
        Ok(Content {
            config,
            spells,
            monsters,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
