//! Content loaders for reading fight data from files.
//!
//! Spells and monsters are RON catalogs, the fight configuration is TOML.
//! Every loader deserializes straight into `fight-core` types.

pub mod config;
pub mod factory;
pub mod monsters;
pub mod spells;

pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use monsters::MonsterLoader;
pub use spells::SpellLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
