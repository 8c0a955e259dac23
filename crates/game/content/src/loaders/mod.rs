//! Loaders that read ability and engine data from RON/TOML files.

pub mod abilities;
pub mod config;
pub mod factory;

pub use abilities::{AbilityLoader, LoadReport};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
