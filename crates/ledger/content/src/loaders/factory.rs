//! Content factory for loading a table's data directory.

use std::path::{Path, PathBuf};

use ledger_core::{Archetype, ClubUpgrade, Flaw, RulesConfig, SceneCue};

use crate::loaders::{ArchetypeLoader, ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all table content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── scene_cues.ron
/// ├── club_upgrades.ron
/// ├── archetypes.ron   (optional)
/// └── flaws.ron        (optional)
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

    /// Load rules configuration from `config.toml`.
    ///
    /// A missing file means the default rules.
    pub fn load_config(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(RulesConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the scene cue catalog from `scene_cues.ron`.
    pub fn load_scene_cues(&self, config: &RulesConfig) -> LoadResult<Vec<SceneCue>> {
        let path = self.data_dir.join("scene_cues.ron");
        ItemLoader::load_scene_cues(&path, config)
    }

    /// Load the club upgrade catalog from `club_upgrades.ron`.
    pub fn load_club_upgrades(&self, config: &RulesConfig) -> LoadResult<Vec<ClubUpgrade>> {
        let path = self.data_dir.join("club_upgrades.ron");
        ItemLoader::load_club_upgrades(&path, config)
    }

    /// Load the archetype catalog from `archetypes.ron`; none if missing.
    pub fn load_archetypes(&self, config: &RulesConfig) -> LoadResult<Vec<Archetype>> {
        let path = self.data_dir.join("archetypes.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ArchetypeLoader::load_archetypes(&path, config)
    }

    /// Load the flaw catalog from `flaws.ron`; none if missing.
    pub fn load_flaws(&self) -> LoadResult<Vec<Flaw>> {
        let path = self.data_dir.join("flaws.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ArchetypeLoader::load_flaws(&path)
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

    #[test]
    fn loads_a_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "max_usage_cap = 2\n").unwrap();
        std::fs::write(
            dir.path().join("scene_cues.ron"),
            r#"(scene_cues: [(name: "Faint Dramatically", max_usage: 2, social_standing: -1)])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("club_upgrades.ron"),
            r#"(upgrades: [(name: "Library", min_renown: 1, readies: 2)])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().unwrap();
        assert_eq!(config.max_usage_cap, 2);
        assert_eq!(factory.load_scene_cues(&config).unwrap().len(), 1);
        assert_eq!(factory.load_club_upgrades(&config).unwrap()[0].name, "Library");
        assert!(factory.load_archetypes(&config).unwrap().is_empty());

        std::fs::write(dir.path().join("flaws.ron"), r#"(flaws: [(name: "Gambler")])"#).unwrap();
        assert_eq!(factory.load_flaws().unwrap()[0].name, "Gambler");
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), RulesConfig::default());
        assert!(factory.load_scene_cues(&RulesConfig::default()).is_err());
    }
}
