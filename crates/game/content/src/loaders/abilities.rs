//! Ability catalog loader.
//!
//! Each ability compiles on its own: an invalid entry is reported and skipped,
//! the rest of the catalog still loads.

use std::path::Path;

use mechanics_core::{AbilityDatabase, EngineConfig, MechanicsError};
use tracing::{debug, info, warn};

use crate::compile::{CompileError, compile_ability};
use crate::formats::AbilitySpec;
use crate::loaders::{LoadResult, read_file};

const EMBEDDED_ABILITIES: &str = include_str!("../../data/abilities.ron");

/// What happened to each entry of a catalog.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<(String, CompileError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Parses a RON list of [`AbilitySpec`]s without compiling them.
    pub fn parse(content: &str) -> LoadResult<Vec<AbilitySpec>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))
    }

    pub fn load(path: &Path, config: &EngineConfig) -> LoadResult<(AbilityDatabase, LoadReport)> {
        let content = read_file(path)?;
        let loaded = Self::load_str(&content, config)?;
        info!(
            target: "mechanics::abilities",
            path = %path.display(),
            count = loaded.0.len(),
            "loaded ability catalog"
        );
        Ok(loaded)
    }

    /// Loads the catalog bundled with the crate.
    pub fn load_embedded(config: &EngineConfig) -> LoadResult<(AbilityDatabase, LoadReport)> {
        Self::load_str(EMBEDDED_ABILITIES, config)
    }

    pub fn load_str(
        content: &str,
        config: &EngineConfig,
    ) -> LoadResult<(AbilityDatabase, LoadReport)> {
        let specs = Self::parse(content)?;
        Ok(Self::build(&specs, config))
    }

    /// Compiles every spec. Never fails as a whole.
    pub fn build(specs: &[AbilitySpec], config: &EngineConfig) -> (AbilityDatabase, LoadReport) {
        let mut database = AbilityDatabase::new();
        let mut report = LoadReport::default();

        for spec in specs {
            match compile_ability(spec, config) {
                Ok(ability) => {
                    debug!(
                        target: "mechanics::abilities",
                        name = %spec.name,
                        ops = ability.graph.ops().len(),
                        "compiled ability"
                    );
                    database.insert(ability);
                    report.loaded.push(spec.name.clone());
                }
                Err(error) => {
                    warn!(
                        target: "mechanics::abilities",
                        name = %spec.name,
                        code = error.error_code(),
                        %error,
                        "skipping ability"
                    );
                    report.skipped.push((spec.name.clone(), error));
                }
            }
        }

        (database, report)
    }
}
