//! Clamped integer counters.
//!
//! Every numeric track on a sheet (social standing, renown, traits, status,
//! luck coins) is a [`ClampedCounter`]: an integer confined to a closed range
//! whose mutations saturate at the bounds instead of failing.

use crate::error::ConfigError;

/// Closed integer range `[min, max]` for a counter.
///
/// Centralizes the clamping bounds of every track so the ranges can be read
/// (and tuned through [`crate::RulesConfig`]) in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterBounds {
    pub min: i32,
    pub max: i32,
}

impl CounterBounds {
    /// Social standing [-10, 10]. Negative is dignity, positive is scandal.
    pub const SOCIAL_STANDING: Self = Self { min: -10, max: 10 };

    /// Club renown [0, 15].
    pub const RENOWN: Self = Self { min: 0, max: 15 };

    /// Character traits [1, 4]. The upper bound may be lowered by the social club.
    pub const TRAIT: Self = Self { min: 1, max: 4 };

    /// Character status [1, 3].
    pub const STATUS: Self = Self { min: 1, max: 3 };

    /// Luck coins [0, 3].
    pub const LUCK_COINS: Self = Self { min: 0, max: 3 };

    /// Creates bounds, rejecting `min > max`.
    pub const fn new(min: i32, max: i32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns true if `value` lies within the bounds.
    pub const fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Returns true if `other` lies entirely within these bounds.
    pub const fn encloses(&self, other: CounterBounds) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Clamps `value` into the bounds.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Integer counter confined to a closed range.
///
/// # Invariant
///
/// `min <= value <= max` holds after construction and after every operation,
/// including deserialization. Mutations saturate silently; callers that need to
/// know whether anything changed compare the returned value with the old one.
///
/// # Example
/// ```
/// # use ledger_core::ClampedCounter;
/// let mut counter = ClampedCounter::new(9, -10, 10).unwrap();
/// assert_eq!(counter.increment(5), 10);
/// assert_eq!(counter.decrement(25), -10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CounterRepr"))]
pub struct ClampedCounter {
    value: i32,
    min: i32,
    max: i32,
}

impl ClampedCounter {
    /// Creates a counter, clamping `initial` into `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] if `min > max`.
    pub fn new(initial: i32, min: i32, max: i32) -> Result<Self, ConfigError> {
        let bounds = CounterBounds::new(min, max)?;
        Ok(Self::within(initial, bounds))
    }

    /// Creates a counter from already validated bounds.
    pub fn within(initial: i32, bounds: CounterBounds) -> Self {
        Self {
            value: bounds.clamp(initial),
            min: bounds.min,
            max: bounds.max,
        }
    }

    pub const fn value(&self) -> i32 {
        self.value
    }

    pub const fn min(&self) -> i32 {
        self.min
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    pub const fn bounds(&self) -> CounterBounds {
        CounterBounds {
            min: self.min,
            max: self.max,
        }
    }

    /// Returns true if the counter sits at its upper bound.
    pub const fn is_at_max(&self) -> bool {
        self.value == self.max
    }

    /// Returns true if the counter sits at its lower bound.
    pub const fn is_at_min(&self) -> bool {
        self.value == self.min
    }

    /// Adds `step`, saturating at `max`. Returns the resulting value.
    pub fn increment(&mut self, step: i32) -> i32 {
        self.set(self.value.saturating_add(step))
    }

    /// Subtracts `step`, saturating at `min`. Returns the resulting value.
    pub fn decrement(&mut self, step: i32) -> i32 {
        self.set(self.value.saturating_sub(step))
    }

    /// Clamps and assigns `value`. Returns the resulting value.
    pub fn set(&mut self, value: i32) -> i32 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }
}

/// Unvalidated wire form of [`ClampedCounter`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CounterRepr {
    value: i32,
    min: i32,
    max: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<CounterRepr> for ClampedCounter {
    type Error = ConfigError;

    fn try_from(repr: CounterRepr) -> Result<Self, Self::Error> {
        Self::new(repr.value, repr.min, repr.max)
    }
}
