use crate::character::TraitKey;
use crate::ledger::SceneCue;

/// A character's flaw. A sheet holds at most one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flaw {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl Flaw {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A character template: the primary trait, starting readies and the items a
/// character receives on taking it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Archetype {
    pub name: String,
    pub primary: TraitKey,
    pub readies: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scene_cues: Vec<SceneCue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flaw: Option<Flaw>,
}

impl Archetype {
    pub fn new(name: impl Into<String>, primary: TraitKey, readies: i32) -> Self {
        Self {
            name: name.into(),
            primary,
            readies,
            scene_cues: Vec::new(),
            flaw: None,
        }
    }

    #[must_use]
    pub fn with_scene_cue(mut self, cue: SceneCue) -> Self {
        self.scene_cues.push(cue);
        self
    }

    #[must_use]
    pub fn with_flaw(mut self, flaw: Flaw) -> Self {
        self.flaw = Some(flaw);
        self
    }
}
