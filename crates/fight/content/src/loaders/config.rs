//! Fight configuration loader.

use std::path::Path;

use fight_core::FightConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for fight configuration from TOML files.
///
/// Missing keys keep their [`FightConfig::new`] defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<FightConfig> {
        let content = read_file(path)?;
        let config: FightConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config: FightConfig = toml::from_str("turn_duration_ms = 15000").unwrap();
        assert_eq!(config.turn_duration_ms, 15_000);
        assert_eq!(config.cast_duration_ms, FightConfig::DEFAULT_CAST_DURATION_MS);
    }
}
