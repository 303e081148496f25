use crate::counter::CounterBounds;
use crate::error::ConfigError;

/// Rules constants and tunable bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Bounds of a character's social standing.
    pub social_standing: CounterBounds,
    /// Bounds of a social club's renown.
    pub renown: CounterBounds,
    /// Bounds of a character trait before club caps apply.
    pub traits: CounterBounds,
    /// Lowest value of the archetype's primary trait.
    pub archetype_trait_min: i32,
    pub status: CounterBounds,
    pub luck_coins: CounterBounds,
    /// Highest `max_usage` an item definition may declare.
    pub max_usage_cap: i32,
}

impl RulesConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ARCHETYPE_TRAIT_MIN: i32 = 2;
    pub const DEFAULT_MAX_USAGE_CAP: i32 = 3;

    pub fn new() -> Self {
        Self {
            social_standing: CounterBounds::SOCIAL_STANDING,
            renown: CounterBounds::RENOWN,
            traits: CounterBounds::TRAIT,
            archetype_trait_min: Self::DEFAULT_ARCHETYPE_TRAIT_MIN,
            status: CounterBounds::STATUS,
            luck_coins: CounterBounds::LUCK_COINS,
            max_usage_cap: Self::DEFAULT_MAX_USAGE_CAP,
        }
    }

    /// Checks that every range is well formed.
    ///
    /// Deserialized configs bypass [`CounterBounds::new`], so loaders call this
    /// before handing a config out. Persisted counters are read back within
    /// the standard ranges, so the counter ranges here may narrow those but
    /// never widen them.
    ///
    /// # Errors
    ///
    /// Returns the first inverted range, or [`ConfigError::InvalidConfiguration`]
    /// for a range wider than its standard one, a negative usage cap, or an
    /// archetype minimum outside the trait range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for bounds in [
            self.social_standing,
            self.renown,
            self.traits,
            self.status,
            self.luck_coins,
        ] {
            CounterBounds::new(bounds.min, bounds.max)?;
        }
        for (field, bounds, standard) in [
            ("social_standing", self.social_standing, CounterBounds::SOCIAL_STANDING),
            ("renown", self.renown, CounterBounds::RENOWN),
            ("status", self.status, CounterBounds::STATUS),
            ("luck_coins", self.luck_coins, CounterBounds::LUCK_COINS),
        ] {
            if !standard.encloses(bounds) {
                let value = if bounds.max > standard.max {
                    bounds.max
                } else {
                    bounds.min
                };
                return Err(ConfigError::InvalidConfiguration {
                    field,
                    value,
                    reason: "must lie within the standard range",
                });
            }
        }
        if self.max_usage_cap < 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "max_usage_cap",
                value: self.max_usage_cap,
                reason: "must not be negative",
            });
        }
        if !self.traits.contains(self.archetype_trait_min) {
            return Err(ConfigError::InvalidConfiguration {
                field: "archetype_trait_min",
                value: self.archetype_trait_min,
                reason: "must lie within the trait bounds",
            });
        }
        Ok(())
    }

    /// Checks an item definition's usage capacity against [`Self::max_usage_cap`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] when `max_usage` is
    /// negative or above the cap.
    pub fn check_max_usage(&self, max_usage: i32) -> Result<(), ConfigError> {
        if max_usage < 0 {
            return Err(ConfigError::negative_max_usage(max_usage));
        }
        if max_usage > self.max_usage_cap {
            return Err(ConfigError::InvalidConfiguration {
                field: "max_usage",
                value: max_usage,
                reason: "exceeds the configured usage cap",
            });
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
