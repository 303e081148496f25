//! Club renown and the upgrade acquisition check.

use crate::counter::{ClampedCounter, CounterBounds};
use crate::ledger::ClubUpgrade;

/// Verdict of the club-upgrade acquisition check.
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
pub enum AcquisitionDecision {
    Approved,
    /// The club's renown is below the upgrade's minimum. Checked first.
    InsufficientRenown,
    /// The club cannot pay the upgrade's cost.
    InsufficientFunds,
}

impl AcquisitionDecision {
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// A social club's renown over `[0, 15]`.
///
/// Persisted as the bare value, clamped into [`CounterBounds::RENOWN`] on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i32", into = "i32"))]
pub struct RenownTrack {
    counter: ClampedCounter,
}

impl RenownTrack {
    /// Creates a track at `value`, clamped into [`CounterBounds::RENOWN`].
    pub fn new(value: i32) -> Self {
        Self::with_bounds(value, CounterBounds::RENOWN)
    }

    /// Creates a track with custom bounds (see [`crate::RulesConfig`]).
    pub fn with_bounds(value: i32, bounds: CounterBounds) -> Self {
        Self {
            counter: ClampedCounter::within(value, bounds),
        }
    }

    /// The same renown, clamped into `bounds`.
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

    /// Adds `delta`, saturating at the bounds. Returns the new renown.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.counter.increment(delta)
    }

    /// Decides whether the club may acquire an upgrade.
    ///
    /// Pure: debiting `cost` from the club's funds is left to the caller.
    pub const fn check_acquisition(
        &self,
        min_renown: i32,
        cost: i32,
        funds: i32,
    ) -> AcquisitionDecision {
        if self.counter.value() < min_renown {
            AcquisitionDecision::InsufficientRenown
        } else if funds < cost {
            AcquisitionDecision::InsufficientFunds
        } else {
            AcquisitionDecision::Approved
        }
    }

    /// [`Self::check_acquisition`] with the upgrade's own requirements.
    pub fn evaluate(&self, upgrade: &ClubUpgrade, funds: i32) -> AcquisitionDecision {
        self.check_acquisition(upgrade.min_renown, upgrade.cost, funds)
    }
}

impl Default for RenownTrack {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<i32> for RenownTrack {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<RenownTrack> for i32 {
    fn from(track: RenownTrack) -> Self {
        track.value()
    }
}
