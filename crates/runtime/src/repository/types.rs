//! Records persisted by a [`super::SheetRepository`].

use std::fmt;

use ledger_core::{CharacterSheet, ClubUpgrade, Flaw, RenownTrack, SceneCue, TraitScores};
use serde::{Deserialize, Serialize};

/// Identifier of a character or a social club.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Identifier of an owned item (scene cue, flaw or club upgrade).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// A player character and the items it owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: ActorId,
    pub name: String,
    pub sheet: CharacterSheet,
    /// Social club the character belongs to.
    #[serde(default)]
    pub club: Option<ActorId>,
    #[serde(default)]
    pub scene_cues: Vec<ItemId>,
    /// The character's single flaw.
    #[serde(default)]
    pub flaw: Option<ItemId>,
}

impl CharacterRecord {
    pub fn new(id: ActorId, name: impl Into<String>, sheet: CharacterSheet) -> Self {
        Self {
            id,
            name: name.into(),
            sheet,
            club: None,
            scene_cues: Vec::new(),
            flaw: None,
        }
    }

    /// True if `item` is one of the character's scene cues.
    pub fn owns(&self, item: ItemId) -> bool {
        self.scene_cues.contains(&item)
    }

    /// Every item the character holds: scene cues, then the flaw.
    pub fn owned_items(&self) -> Vec<ItemId> {
        self.scene_cues.iter().copied().chain(self.flaw).collect()
    }
}

/// A social club: renown, funds and acquired upgrades.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubRecord {
    pub id: ActorId,
    pub name: String,
    pub renown: RenownTrack,
    /// Readies available for upgrades.
    pub funds: i32,
    /// Per-trait maximums the club imposes on its members.
    #[serde(default)]
    pub trait_caps: Option<TraitScores>,
    #[serde(default)]
    pub upgrades: Vec<ItemId>,
}

impl ClubRecord {
    pub fn new(id: ActorId, name: impl Into<String>, renown: RenownTrack, funds: i32) -> Self {
        Self {
            id,
            name: name.into(),
            renown,
            funds,
            trait_caps: None,
            upgrades: Vec::new(),
        }
    }

    pub fn owns(&self, item: ItemId) -> bool {
        self.upgrades.contains(&item)
    }
}

/// An owned item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRecord {
    SceneCue(SceneCue),
    ClubUpgrade(ClubUpgrade),
    Flaw(Flaw),
}

impl ItemRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::SceneCue(cue) => &cue.name,
            Self::ClubUpgrade(upgrade) => &upgrade.name,
            Self::Flaw(flaw) => &flaw.name,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SceneCue(_) => "scene_cue",
            Self::ClubUpgrade(_) => "club_upgrade",
            Self::Flaw(_) => "flaw",
        }
    }
}
