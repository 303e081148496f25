//! Scene cue and club upgrade catalog loader.

use std::collections::HashSet;
use std::path::Path;

use ledger_core::{ClubUpgrade, RulesConfig, SceneCue, StandingDelta, TableRef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Scene cue definition as written in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCueSpec {
    pub name: String,
    #[serde(default)]
    pub max_usage: i32,
    /// -1 (dignity), 0 or 1 (scandal).
    #[serde(default)]
    pub social_standing: i32,
    /// Table reference; blank means none.
    #[serde(default)]
    pub influence: String,
    #[serde(default)]
    pub extra_items: Vec<String>,
}

impl SceneCueSpec {
    /// Validate the definition and build a cue with an empty ledger.
    pub fn build(&self, config: &RulesConfig) -> LoadResult<SceneCue> {
        let invalid = |e: ledger_core::ConfigError| {
            anyhow::anyhow!("Invalid scene cue '{}': {}", self.name, e)
        };

        config.check_max_usage(self.max_usage).map_err(invalid)?;
        let delta = StandingDelta::try_from(self.social_standing).map_err(invalid)?;

        let mut cue = SceneCue::new(self.name.clone(), self.max_usage)
            .map_err(invalid)?
            .with_standing_delta(delta);
        if let Some(table) = TableRef::parse(&self.influence) {
            cue = cue.with_influence(table);
        }
        for item in self.extra_items.iter().filter(|item| !item.trim().is_empty()) {
            cue = cue.with_extra_item(item.clone()).map_err(invalid)?;
        }

        Ok(cue)
    }
}

/// Club upgrade definition as written in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubUpgradeSpec {
    pub name: String,
    #[serde(default)]
    pub min_renown: i32,
    /// Cost in readies.
    #[serde(default)]
    pub readies: i32,
    /// Requirement the game master confirms by hand; blank means none.
    #[serde(default)]
    pub extra_requirement: String,
    #[serde(default)]
    pub has_usage: bool,
    #[serde(default)]
    pub max_usage: i32,
}

impl ClubUpgradeSpec {
    /// Validate the definition and build an upgrade.
    pub fn build(&self, config: &RulesConfig) -> LoadResult<ClubUpgrade> {
        let invalid = |e: ledger_core::ConfigError| {
            anyhow::anyhow!("Invalid club upgrade '{}': {}", self.name, e)
        };

        if self.min_renown > config.renown.max {
            anyhow::bail!(
                "Invalid club upgrade '{}': min_renown {} can never be reached (max renown {})",
                self.name,
                self.min_renown,
                config.renown.max
            );
        }

        let mut upgrade = ClubUpgrade::new(self.name.clone(), self.min_renown, self.readies)
            .map_err(invalid)?
            .with_extra_requirement(self.extra_requirement.clone());
        if self.has_usage {
            config.check_max_usage(self.max_usage).map_err(invalid)?;
            upgrade = upgrade.with_usage(self.max_usage).map_err(invalid)?;
        }

        Ok(upgrade)
    }
}

/// Scene cue catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCueCatalog {
    pub scene_cues: Vec<SceneCueSpec>,
}

/// Club upgrade catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubUpgradeCatalog {
    pub upgrades: Vec<ClubUpgradeSpec>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load a scene cue catalog from a RON file.
    pub fn load_scene_cues(path: &Path, config: &RulesConfig) -> LoadResult<Vec<SceneCue>> {
        let content = read_file(path)?;
        Self::parse_scene_cues(&content, config)
    }

    /// Load a club upgrade catalog from a RON file.
    pub fn load_club_upgrades(path: &Path, config: &RulesConfig) -> LoadResult<Vec<ClubUpgrade>> {
        let content = read_file(path)?;
        Self::parse_club_upgrades(&content, config)
    }

    pub fn parse_scene_cues(content: &str, config: &RulesConfig) -> LoadResult<Vec<SceneCue>> {
        let catalog: SceneCueCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scene cue catalog RON: {}", e))?;
        ensure_unique(catalog.scene_cues.iter().map(|spec| spec.name.as_str()))?;

        catalog
            .scene_cues
            .iter()
            .map(|spec| spec.build(config))
            .collect()
    }

    pub fn parse_club_upgrades(content: &str, config: &RulesConfig) -> LoadResult<Vec<ClubUpgrade>> {
        let catalog: ClubUpgradeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse club upgrade catalog RON: {}", e))?;
        ensure_unique(catalog.upgrades.iter().map(|spec| spec.name.as_str()))?;

        catalog
            .upgrades
            .iter()
            .map(|spec| spec.build(config))
            .collect()
    }
}

pub(crate) fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            anyhow::bail!("Duplicate catalog entry '{}'", name);
        }
    }
    Ok(())
}
