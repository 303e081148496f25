//! Character traits and trait rolls.

use crate::input::Nudge;

/// The four character traits, keyed as they are stored on sheets.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TraitKey {
    Bp,
    Ce,
    Ws,
    Cp,
}

/// One value per trait.
///
/// Used both for a character's scores and for a social club's per-trait caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitScores {
    pub bp: i32,
    pub ce: i32,
    pub ws: i32,
    pub cp: i32,
}

impl TraitScores {
    /// Every trait at `value`.
    pub const fn uniform(value: i32) -> Self {
        Self {
            bp: value,
            ce: value,
            ws: value,
            cp: value,
        }
    }

    pub const fn get(&self, key: TraitKey) -> i32 {
        match key {
            TraitKey::Bp => self.bp,
            TraitKey::Ce => self.ce,
            TraitKey::Ws => self.ws,
            TraitKey::Cp => self.cp,
        }
    }

    pub fn set(&mut self, key: TraitKey, value: i32) {
        match key {
            TraitKey::Bp => self.bp = value,
            TraitKey::Ce => self.ce = value,
            TraitKey::Ws => self.ws = value,
            TraitKey::Cp => self.cp = value,
        }
    }

    /// Steps `key` by `nudge` if the result stays within `[min, max]`.
    ///
    /// A step that would leave the range leaves the value untouched, even when
    /// the value already sits outside the range (a club cap lowered after the
    /// trait was raised, for instance).
    pub fn nudge(&mut self, key: TraitKey, nudge: Nudge, min: i32, max: i32) -> TraitChange {
        let before = self.get(key);
        let candidate = before + nudge.step();
        let after = match nudge {
            Nudge::Down if candidate >= min => candidate,
            Nudge::Up if candidate <= max => candidate,
            _ => before,
        };
        self.set(key, after);
        TraitChange { key, before, after }
    }
}

impl Default for TraitScores {
    fn default() -> Self {
        Self::uniform(1)
    }
}

/// A trait adjustment as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitChange {
    pub key: TraitKey,
    pub before: i32,
    pub after: i32,
}

impl TraitChange {
    pub const fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Grade of a trait roll.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RollGrade {
    /// No success.
    Fail,
    /// Exactly one success.
    Success,
    /// Two or more successes.
    Successes,
}

/// Evaluated trait roll: one d6 per trait point, 5+ is a success.
///
/// Rolling the dice is the host's concern; this only reads the faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitRoll {
    pub key: TraitKey,
    pub successes: u32,
    pub grade: RollGrade,
}

impl TraitRoll {
    pub const SUCCESS_THRESHOLD: u8 = 5;

    pub fn evaluate(key: TraitKey, faces: &[u8]) -> Self {
        let successes = faces
            .iter()
            .filter(|face| **face >= Self::SUCCESS_THRESHOLD)
            .count() as u32;
        let grade = match successes {
            0 => RollGrade::Fail,
            1 => RollGrade::Success,
            _ => RollGrade::Successes,
        };
        Self {
            key,
            successes,
            grade,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.successes > 0
    }
}
