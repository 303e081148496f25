//! Social standing: a character's reputation between dignity and scandal.

use crate::counter::{ClampedCounter, CounterBounds};
use crate::error::ConfigError;

/// Classification of a social standing value by sign.
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
pub enum Standing {
    /// Negative standing.
    Dignity,
    /// Zero.
    Neutral,
    /// Positive standing.
    Scandal,
}

/// Classifies a standing value: negative is dignity, positive is scandal.
pub const fn classify(standing: i32) -> Standing {
    if standing < 0 {
        Standing::Dignity
    } else if standing > 0 {
        Standing::Scandal
    } else {
        Standing::Neutral
    }
}

/// Standing change a scene cue applies when consumed.
///
/// Restricted to a single step in either direction.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i32", into = "i32"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StandingDelta {
    /// -1
    Dignity,
    /// 0
    #[default]
    Unchanged,
    /// +1
    Scandal,
}

impl StandingDelta {
    pub const fn value(self) -> i32 {
        match self {
            Self::Dignity => -1,
            Self::Unchanged => 0,
            Self::Scandal => 1,
        }
    }
}

impl TryFrom<i32> for StandingDelta {
    type Error = ConfigError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Dignity),
            0 => Ok(Self::Unchanged),
            1 => Ok(Self::Scandal),
            other => Err(ConfigError::InvalidStandingDelta(other)),
        }
    }
}

impl From<StandingDelta> for i32 {
    fn from(delta: StandingDelta) -> Self {
        delta.value()
    }
}

/// A standing value together with its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandingReading {
    pub value: i32,
    pub standing: Standing,
}

impl StandingReading {
    pub const fn of(value: i32) -> Self {
        Self {
            value,
            standing: classify(value),
        }
    }

    /// Distance from neutral, as shown on the sheet.
    pub const fn magnitude(&self) -> i32 {
        self.value.abs()
    }
}

/// A character's social standing over `[-10, 10]`.
///
/// Only the value is persisted. A stored value is clamped into
/// [`CounterBounds::SOCIAL_STANDING`] when it is read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i32", into = "i32"))]
pub struct SocialStandingTrack {
    counter: ClampedCounter,
}

impl SocialStandingTrack {
    /// Creates a track at `value`, clamped into [`CounterBounds::SOCIAL_STANDING`].
    pub fn new(value: i32) -> Self {
        Self::with_bounds(value, CounterBounds::SOCIAL_STANDING)
    }

    /// Creates a track with custom bounds (see [`crate::RulesConfig`]).
    pub fn with_bounds(value: i32, bounds: CounterBounds) -> Self {
        Self {
            counter: ClampedCounter::within(value, bounds),
        }
    }

    /// The same value, clamped into `bounds`.
    #[must_use]
    pub fn rebind(self, bounds: CounterBounds) -> Self {
        Self::with_bounds(self.value(), bounds)
    }

    pub const fn value(&self) -> i32 {
        self.counter.value()
    }

    pub const fn bounds(&self) -> CounterBounds {
        self.counter.bounds()
    }

    pub const fn reading(&self) -> StandingReading {
        StandingReading::of(self.counter.value())
    }

    pub const fn standing(&self) -> Standing {
        classify(self.counter.value())
    }

    /// Adds `delta`, saturating at the bounds.
    pub fn adjust(&mut self, delta: i32) -> StandingReading {
        StandingReading::of(self.counter.increment(delta))
    }

    /// One step towards dignity.
    pub fn increase_dignity(&mut self) -> StandingReading {
        self.adjust(StandingDelta::Dignity.value())
    }

    /// One step towards scandal.
    pub fn increase_scandal(&mut self) -> StandingReading {
        self.adjust(StandingDelta::Scandal.value())
    }
}

impl Default for SocialStandingTrack {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<i32> for SocialStandingTrack {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<SocialStandingTrack> for i32 {
    fn from(track: SocialStandingTrack) -> Self {
        track.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_by_sign() {
        assert_eq!(classify(-3), Standing::Dignity);
        assert_eq!(classify(0), Standing::Neutral);
        assert_eq!(classify(4), Standing::Scandal);
        assert_eq!(classify(i32::MIN), Standing::Dignity);
    }

    #[test]
    fn adjust_saturates_at_ten() {
        let mut track = SocialStandingTrack::new(9);
        let reading = track.adjust(5);
        assert_eq!(reading.value, 10);
        assert_eq!(reading.standing, Standing::Scandal);

        let mut track = SocialStandingTrack::new(-9);
        assert_eq!(track.adjust(-5).value, -10);
    }

    #[test]
    fn stepping_through_neutral_changes_classification() {
        let mut track = SocialStandingTrack::new(1);
        assert_eq!(track.increase_dignity().standing, Standing::Neutral);
        let reading = track.increase_dignity();
        assert_eq!(reading.standing, Standing::Dignity);
        assert_eq!(reading.magnitude(), 1);
        assert_eq!(track.increase_scandal().standing, Standing::Neutral);
    }

    #[test]
    fn construction_clamps() {
        assert_eq!(SocialStandingTrack::new(25).value(), 10);
        assert_eq!(SocialStandingTrack::default().standing(), Standing::Neutral);
    }

    #[test]
    fn rebinding_keeps_the_value_inside_new_bounds() {
        let narrow = CounterBounds::new(-5, 5).unwrap();
        let track = SocialStandingTrack::new(-8).rebind(narrow);
        assert_eq!(track.value(), -5);
        assert_eq!(track.bounds(), narrow);
        assert_eq!(SocialStandingTrack::from(40).value(), 10);
        assert_eq!(i32::from(SocialStandingTrack::new(-3)), -3);
    }

    #[test]
    fn standing_delta_conversions() {
        assert_eq!(StandingDelta::try_from(-1), Ok(StandingDelta::Dignity));
        assert_eq!(StandingDelta::try_from(1), Ok(StandingDelta::Scandal));
        assert_eq!(
            StandingDelta::try_from(2),
            Err(ConfigError::InvalidStandingDelta(2))
        );
        assert_eq!(i32::from(StandingDelta::Unchanged), 0);
        assert_eq!("scandal".parse::<StandingDelta>(), Ok(StandingDelta::Scandal));
    }
}
