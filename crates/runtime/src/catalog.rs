//! Item catalogs a session draws new scene cues, upgrades, archetypes and
//! flaws from.

use ledger_content::{ContentFactory, LoadResult};
use ledger_core::{Archetype, ClubUpgrade, Flaw, RulesConfig, SceneCue};

/// Named item definitions, all with empty ledgers.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    scene_cues: Vec<SceneCue>,
    club_upgrades: Vec<ClubUpgrade>,
    archetypes: Vec<Archetype>,
    flaws: Vec<Flaw>,
}

impl Catalog {
    pub fn new(scene_cues: Vec<SceneCue>, club_upgrades: Vec<ClubUpgrade>) -> Self {
        Self {
            scene_cues,
            club_upgrades,
            archetypes: Vec::new(),
            flaws: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_archetypes(mut self, archetypes: Vec<Archetype>) -> Self {
        self.archetypes = archetypes;
        self
    }

    #[must_use]
    pub fn with_flaws(mut self, flaws: Vec<Flaw>) -> Self {
        self.flaws = flaws;
        self
    }

    /// Load every catalog from a content directory.
    pub fn load(factory: &ContentFactory, config: &RulesConfig) -> LoadResult<Self> {
        Ok(Self::new(
            factory.load_scene_cues(config)?,
            factory.load_club_upgrades(config)?,
        )
        .with_archetypes(factory.load_archetypes(config)?)
        .with_flaws(factory.load_flaws()?))
    }

    pub fn scene_cue(&self, name: &str) -> Option<&SceneCue> {
        self.scene_cues.iter().find(|cue| cue.name == name)
    }

    pub fn club_upgrade(&self, name: &str) -> Option<&ClubUpgrade> {
        self.club_upgrades.iter().find(|upgrade| upgrade.name == name)
    }

    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|archetype| archetype.name == name)
    }

    pub fn flaw(&self, name: &str) -> Option<&Flaw> {
        self.flaws.iter().find(|flaw| flaw.name == name)
    }

    pub fn scene_cues(&self) -> &[SceneCue] {
        &self.scene_cues
    }

    pub fn club_upgrades(&self) -> &[ClubUpgrade] {
        &self.club_upgrades
    }
}
