//! Content factory for loading engine data from a directory.

use std::path::{Path, PathBuf};

use mechanics_core::{AbilityDatabase, EngineConfig};

use crate::loaders::{AbilityLoader, ConfigLoader, LoadReport, LoadResult};

/// Loads all mechanics content from a data directory.
///
/// ```text
/// data_dir/
/// ├── engine.toml
/// └── abilities.ron
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

    /// Factory over the data bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Loads `engine.toml`, falling back to defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("engine.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Loads `abilities.ron`, compiled against `config`.
    pub fn load_abilities(&self, config: &EngineConfig) -> LoadResult<(AbilityDatabase, LoadReport)> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"), config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
