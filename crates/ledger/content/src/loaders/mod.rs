//! Content loaders for reading table data from files.

pub mod archetypes;
pub mod config;
pub mod factory;
pub mod items;

pub use archetypes::{ArchetypeLoader, ArchetypeSpec, FlawSpec};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use items::{ClubUpgradeSpec, ItemLoader, SceneCueSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
