//! Character sheet rules.
//!
//! A character owns its traits, a status and luck-coin counter, the nickname
//! flag and a [`SocialStandingTrack`]. Scene cues and the flaw owned by the
//! character live beside the sheet, not inside it.

mod archetype;
mod traits;

pub use archetype::{Archetype, Flaw};
pub use traits::{RollGrade, TraitChange, TraitKey, TraitRoll, TraitScores};

use bitflags::bitflags;

use crate::config::RulesConfig;
use crate::counter::ClampedCounter;
use crate::input::Nudge;
use crate::tracks::{SocialStandingTrack, StandingReading};

bitflags! {
    /// Tracks which persisted fields of a character sheet changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SheetFields: u8 {
        const TRAITS          = 1 << 0;
        const STATUS          = 1 << 1;
        const LUCK_COINS      = 1 << 2;
        const NICKNAME        = 1 << 3;
        const SOCIAL_STANDING = 1 << 4;
        const ARCHETYPE       = 1 << 5;
    }
}

/// A player character's mutable sheet.
///
/// Counters persist as bare values. Reading a sheet back clamps them into
/// the standard ranges; [`CharacterSheet::rebind`] then narrows them to a
/// session's [`RulesConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SheetRepr", into = "SheetRepr"))]
pub struct CharacterSheet {
    /// Name of the archetype the character took, if any.
    pub archetype: Option<String>,
    pub traits: TraitScores,
    /// Primary trait of the character's archetype, floored at a higher minimum.
    pub archetype_trait: Option<TraitKey>,
    /// Starting funds granted by the archetype.
    pub readies: i32,
    pub nickname_used: bool,
    status: ClampedCounter,
    luck_coins: ClampedCounter,
    social_standing: SocialStandingTrack,
}

impl CharacterSheet {
    /// A fresh sheet: every trait at its minimum, lowest status, no luck coins,
    /// neutral standing.
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            archetype: None,
            traits: TraitScores::uniform(config.traits.min),
            archetype_trait: None,
            readies: 0,
            nickname_used: false,
            status: ClampedCounter::within(config.status.min, config.status),
            luck_coins: ClampedCounter::within(config.luck_coins.min, config.luck_coins),
            social_standing: SocialStandingTrack::with_bounds(0, config.social_standing),
        }
    }

    pub const fn status(&self) -> i32 {
        self.status.value()
    }

    pub const fn luck_coins(&self) -> i32 {
        self.luck_coins.value()
    }

    pub const fn social_standing(&self) -> &SocialStandingTrack {
        &self.social_standing
    }

    /// Replaces the standing track with a persisted one.
    #[must_use]
    pub fn with_social_standing(mut self, track: SocialStandingTrack) -> Self {
        self.social_standing = track;
        self
    }

    /// Re-clamps every counter into `config`'s ranges, keeping values.
    pub fn rebind(&mut self, config: &RulesConfig) {
        self.status = ClampedCounter::within(self.status.value(), config.status);
        self.luck_coins = ClampedCounter::within(self.luck_coins.value(), config.luck_coins);
        self.social_standing = self.social_standing.rebind(config.social_standing);
    }

    pub fn adjust_standing(&mut self, delta: i32) -> StandingReading {
        self.social_standing.adjust(delta)
    }

    /// Lowest value `key` may take on this sheet.
    pub fn trait_min(&self, key: TraitKey, config: &RulesConfig) -> i32 {
        if self.archetype_trait == Some(key) {
            config.archetype_trait_min
        } else {
            config.traits.min
        }
    }

    /// Highest value `key` may take, given the social club's caps if any.
    pub fn trait_max(key: TraitKey, club_caps: Option<&TraitScores>, config: &RulesConfig) -> i32 {
        club_caps.map_or(config.traits.max, |caps| caps.get(key))
    }

    /// Steps a trait up or down within its range.
    pub fn nudge_trait(
        &mut self,
        key: TraitKey,
        nudge: Nudge,
        club_caps: Option<&TraitScores>,
        config: &RulesConfig,
    ) -> TraitChange {
        let min = self.trait_min(key, config);
        let max = Self::trait_max(key, club_caps, config);
        self.traits.nudge(key, nudge, min, max)
    }

    /// Evaluates a roll of `faces`; the pool size is the trait's value.
    pub fn trait_roll(&self, key: TraitKey, faces: &[u8]) -> TraitRoll {
        TraitRoll::evaluate(key, faces)
    }

    /// Dice to roll for `key`.
    pub fn dice_pool(&self, key: TraitKey) -> u32 {
        self.traits.get(key).max(0) as u32
    }

    /// Returns `(before, after)`.
    pub fn nudge_status(&mut self, nudge: Nudge) -> (i32, i32) {
        let before = self.status.value();
        (before, self.status.increment(nudge.step()))
    }

    /// Returns `(before, after)`.
    pub fn nudge_luck_coins(&mut self, nudge: Nudge) -> (i32, i32) {
        let before = self.luck_coins.value();
        (before, self.luck_coins.increment(nudge.step()))
    }

    /// A plain click marks the nickname as used, alt-click clears it.
    pub fn mark_nickname(&mut self, alt: bool) -> bool {
        self.nickname_used = !alt;
        self.nickname_used
    }

    /// Resets the sheet for a new archetype.
    ///
    /// Every trait drops to the trait minimum and the primary trait starts at
    /// the archetype minimum.
    pub fn apply_archetype(&mut self, primary: TraitKey, readies: i32, config: &RulesConfig) {
        self.traits = TraitScores::uniform(config.traits.min);
        self.traits.set(primary, config.archetype_trait_min);
        self.archetype_trait = Some(primary);
        self.readies = readies;
    }

    /// [`Self::apply_archetype`] for a named archetype, recording its name.
    pub fn adopt(&mut self, archetype: &Archetype, config: &RulesConfig) {
        self.apply_archetype(archetype.primary, archetype.readies, config);
        self.archetype = Some(archetype.name.clone());
    }

    /// True once an archetype has been applied.
    pub fn has_archetype(&self) -> bool {
        self.archetype.is_some() || self.archetype_trait.is_some()
    }
}

/// Wire form of [`CharacterSheet`]: counters as bare values.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SheetRepr {
    #[serde(default)]
    archetype: Option<String>,
    traits: TraitScores,
    #[serde(default)]
    archetype_trait: Option<TraitKey>,
    #[serde(default)]
    readies: i32,
    #[serde(default)]
    nickname_used: bool,
    status: i32,
    luck_coins: i32,
    social_standing: SocialStandingTrack,
}

#[cfg(feature = "serde")]
impl From<SheetRepr> for CharacterSheet {
    fn from(repr: SheetRepr) -> Self {
        Self {
            archetype: repr.archetype,
            traits: repr.traits,
            archetype_trait: repr.archetype_trait,
            readies: repr.readies,
            nickname_used: repr.nickname_used,
            status: ClampedCounter::within(repr.status, crate::CounterBounds::STATUS),
            luck_coins: ClampedCounter::within(repr.luck_coins, crate::CounterBounds::LUCK_COINS),
            social_standing: repr.social_standing,
        }
    }
}

#[cfg(feature = "serde")]
impl From<CharacterSheet> for SheetRepr {
    fn from(sheet: CharacterSheet) -> Self {
        Self {
            archetype: sheet.archetype,
            traits: sheet.traits,
            archetype_trait: sheet.archetype_trait,
            readies: sheet.readies,
            nickname_used: sheet.nickname_used,
            status: sheet.status.value(),
            luck_coins: sheet.luck_coins.value(),
            social_standing: sheet.social_standing,
        }
    }
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::new(&RulesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterBounds;
    use crate::tracks::Standing;

    #[test]
    fn fresh_sheet_sits_at_minimums() {
        let sheet = CharacterSheet::default();
        assert_eq!(sheet.traits, TraitScores::uniform(1));
        assert_eq!(sheet.status(), 1);
        assert_eq!(sheet.luck_coins(), 0);
        assert_eq!(sheet.social_standing().standing(), Standing::Neutral);
    }

    #[test]
    fn archetype_floors_primary_trait() {
        let config = RulesConfig::default();
        let mut sheet = CharacterSheet::default();
        sheet.traits = TraitScores::uniform(3);
        sheet.apply_archetype(TraitKey::Ce, 6, &config);

        assert_eq!(sheet.traits.get(TraitKey::Ce), 2);
        assert_eq!(sheet.traits.get(TraitKey::Bp), 1);
        assert_eq!(sheet.readies, 6);
        assert!(!sheet.nudge_trait(TraitKey::Ce, Nudge::Down, None, &config).changed());
        assert_eq!(sheet.nudge_trait(TraitKey::Bp, Nudge::Up, None, &config).after, 2);
    }

    #[test]
    fn adopting_a_named_archetype_records_it() {
        let config = RulesConfig::default();
        let mut sheet = CharacterSheet::default();
        assert!(!sheet.has_archetype());

        sheet.adopt(&Archetype::new("Dandy", TraitKey::Ws, 4), &config);
        assert!(sheet.has_archetype());
        assert_eq!(sheet.archetype.as_deref(), Some("Dandy"));
        assert_eq!(sheet.archetype_trait, Some(TraitKey::Ws));
        assert_eq!(sheet.readies, 4);
    }

    #[test]
    fn rebind_narrows_counters_to_the_config() {
        let config = RulesConfig {
            social_standing: CounterBounds::new(-4, 4).unwrap(),
            status: CounterBounds::new(1, 2).unwrap(),
            ..RulesConfig::default()
        };
        let mut sheet = CharacterSheet::default();
        sheet.adjust_standing(9);
        sheet.nudge_status(Nudge::Up);
        sheet.nudge_status(Nudge::Up);

        sheet.rebind(&config);
        assert_eq!(sheet.social_standing().value(), 4);
        assert_eq!(sheet.social_standing().bounds(), config.social_standing);
        assert_eq!(sheet.status(), 2);
        assert_eq!(sheet.nudge_status(Nudge::Up), (2, 2));
    }

    #[test]
    fn club_caps_bound_traits() {
        let config = RulesConfig::default();
        let caps = TraitScores {
            bp: 2,
            ce: 4,
            ws: 4,
            cp: 3,
        };
        let mut sheet = CharacterSheet::default();
        assert_eq!(sheet.nudge_trait(TraitKey::Bp, Nudge::Up, Some(&caps), &config).after, 2);
        assert!(!sheet.nudge_trait(TraitKey::Bp, Nudge::Up, Some(&caps), &config).changed());
        assert_eq!(CharacterSheet::trait_max(TraitKey::Cp, None, &config), 4);
    }

    #[test]
    fn status_and_luck_saturate() {
        let mut sheet = CharacterSheet::default();
        assert_eq!(sheet.nudge_status(Nudge::Down), (1, 1));
        sheet.nudge_status(Nudge::Up);
        sheet.nudge_status(Nudge::Up);
        assert_eq!(sheet.nudge_status(Nudge::Up), (3, 3));

        assert_eq!(sheet.nudge_luck_coins(Nudge::Up), (0, 1));
        assert_eq!(sheet.nudge_luck_coins(Nudge::Hold), (1, 1));
    }

    #[test]
    fn nickname_follows_alt() {
        let mut sheet = CharacterSheet::default();
        assert!(sheet.mark_nickname(false));
        assert!(!sheet.mark_nickname(true));
    }

    #[test]
    fn dice_pool_matches_trait_value() {
        let mut sheet = CharacterSheet::default();
        sheet.traits.set(TraitKey::Ws, 3);
        assert_eq!(sheet.dice_pool(TraitKey::Ws), 3);
        assert_eq!(sheet.trait_roll(TraitKey::Ws, &[6, 1, 1]).grade, RollGrade::Success);
    }
}
