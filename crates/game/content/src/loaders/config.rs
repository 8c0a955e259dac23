//! Engine configuration loader.

use std::path::Path;

use mechanics_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`EngineConfig`] from TOML files. Missing keys take their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse engine config TOML: {}", e))?;

        if config.max_events_per_flush == 0 {
            anyhow::bail!("max_events_per_flush must be greater than zero");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::load_str("battle_seed = 42\n").unwrap();
        assert_eq!(config.battle_seed, 42);
        assert_eq!(config.max_repeat, EngineConfig::DEFAULT_MAX_REPEAT);
        assert_eq!(
            config.max_events_per_flush,
            EngineConfig::DEFAULT_MAX_EVENTS_PER_FLUSH
        );
    }

    #[test]
    fn rejects_zero_flush_budget() {
        let err = ConfigLoader::load_str("max_events_per_flush = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_events_per_flush"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/engine.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/engine.toml"));
    }
}
