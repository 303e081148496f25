//! Archetype and flaw catalog loader.

use std::path::Path;

use ledger_core::{Archetype, Flaw, RulesConfig, TraitKey};
use serde::{Deserialize, Serialize};

use crate::loaders::items::ensure_unique;
use crate::loaders::{LoadResult, SceneCueSpec, read_file};

/// Flaw definition as written in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlawSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl FlawSpec {
    pub fn build(&self) -> LoadResult<Flaw> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Invalid flaw: name must not be blank");
        }
        Ok(Flaw::new(self.name.clone()).with_description(self.description.clone()))
    }
}

/// Archetype definition as written in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub name: String,
    pub primary_trait: TraitKey,
    /// Starting readies.
    #[serde(default)]
    pub readies: i32,
    /// Scene cues handed to a character taking the archetype.
    #[serde(default)]
    pub scene_cues: Vec<SceneCueSpec>,
    #[serde(default)]
    pub flaw: Option<FlawSpec>,
}

impl ArchetypeSpec {
    /// Validate the definition and its items.
    pub fn build(&self, config: &RulesConfig) -> LoadResult<Archetype> {
        if self.readies < 0 {
            anyhow::bail!(
                "Invalid archetype '{}': readies {} must not be negative",
                self.name,
                self.readies
            );
        }

        let mut archetype = Archetype::new(self.name.clone(), self.primary_trait, self.readies);
        for spec in &self.scene_cues {
            let cue = spec
                .build(config)
                .map_err(|e| anyhow::anyhow!("Invalid archetype '{}': {}", self.name, e))?;
            archetype = archetype.with_scene_cue(cue);
        }
        if let Some(flaw) = &self.flaw {
            let flaw = flaw
                .build()
                .map_err(|e| anyhow::anyhow!("Invalid archetype '{}': {}", self.name, e))?;
            archetype = archetype.with_flaw(flaw);
        }

        Ok(archetype)
    }
}

/// Archetype catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    pub archetypes: Vec<ArchetypeSpec>,
}

/// Flaw catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlawCatalog {
    pub flaws: Vec<FlawSpec>,
}

/// Loader for archetype and flaw catalogs from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load_archetypes(path: &Path, config: &RulesConfig) -> LoadResult<Vec<Archetype>> {
        let content = read_file(path)?;
        Self::parse_archetypes(&content, config)
    }

    pub fn load_flaws(path: &Path) -> LoadResult<Vec<Flaw>> {
        let content = read_file(path)?;
        Self::parse_flaws(&content)
    }

    pub fn parse_archetypes(content: &str, config: &RulesConfig) -> LoadResult<Vec<Archetype>> {
        let catalog: ArchetypeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype catalog RON: {}", e))?;
        ensure_unique(catalog.archetypes.iter().map(|spec| spec.name.as_str()))?;

        catalog
            .archetypes
            .iter()
            .map(|spec| spec.build(config))
            .collect()
    }

    pub fn parse_flaws(content: &str) -> LoadResult<Vec<Flaw>> {
        let catalog: FlawCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse flaw catalog RON: {}", e))?;
        ensure_unique(catalog.flaws.iter().map(|spec| spec.name.as_str()))?;

        catalog.flaws.iter().map(FlawSpec::build).collect()
    }
}
