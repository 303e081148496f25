//! Club upgrades: purchases a social club makes with renown and funds.

use super::{LedgerTransition, UsageEvent, UsageLedger};
use crate::error::ConfigError;

/// Result of firing an event at a club upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClubUpgradeOutcome {
    /// The upgrade tracks usage and the event reached its ledger.
    Transition(LedgerTransition),
    /// The upgrade is a permanent benefit without usage; nothing happened.
    NoUsage,
}

impl ClubUpgradeOutcome {
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Transition(transition) => transition.is_noop(),
            Self::NoUsage => true,
        }
    }

    /// True when a use was actually spent.
    pub fn is_fired(&self) -> bool {
        matches!(
            self,
            Self::Transition(transition)
                if transition.event == UsageEvent::Consume && !transition.is_noop()
        )
    }

    pub fn transition(&self) -> Option<&LedgerTransition> {
        match self {
            Self::Transition(transition) => Some(transition),
            Self::NoUsage => None,
        }
    }
}

/// An upgrade a social club can acquire.
///
/// Acquisition is gated by the club's renown (`min_renown`) and paid for with
/// its funds (`cost`, in readies). Some upgrades also name an extra
/// requirement the game master confirms by hand. Upgrades with a usage ledger
/// can be invoked like scene cues; the rest are permanent benefits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClubUpgrade {
    pub name: String,
    pub min_renown: i32,
    pub cost: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_requirement: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    ledger: Option<UsageLedger>,
}

impl ClubUpgrade {
    /// Creates a permanent upgrade with no usage ledger.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `min_renown` or `cost`
    /// is negative.
    pub fn new(name: impl Into<String>, min_renown: i32, cost: i32) -> Result<Self, ConfigError> {
        if min_renown < 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "min_renown",
                value: min_renown,
                reason: "must not be negative",
            });
        }
        if cost < 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "cost",
                value: cost,
                reason: "must not be negative",
            });
        }
        Ok(Self {
            name: name.into(),
            min_renown,
            cost,
            extra_requirement: None,
            ledger: None,
        })
    }

    /// Gives the upgrade an empty ledger of `max_usage` uses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `max_usage` is negative.
    pub fn with_usage(mut self, max_usage: i32) -> Result<Self, ConfigError> {
        self.ledger = Some(UsageLedger::new(max_usage)?);
        Ok(self)
    }

    /// Replaces the ledger with persisted counters.
    #[must_use]
    pub fn with_ledger(mut self, ledger: UsageLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    #[must_use]
    pub fn with_extra_requirement(mut self, requirement: impl Into<String>) -> Self {
        let requirement = requirement.into();
        self.extra_requirement = (!requirement.trim().is_empty()).then_some(requirement);
        self
    }

    pub fn ledger(&self) -> Option<&UsageLedger> {
        self.ledger.as_ref()
    }

    pub fn has_usage(&self) -> bool {
        self.ledger.is_some()
    }

    /// True when the upgrade tracks usage and has a use left to spend.
    pub fn can_use(&self) -> bool {
        self.ledger.is_some_and(|ledger| ledger.can_consume())
    }

    pub fn apply(&mut self, event: UsageEvent) -> ClubUpgradeOutcome {
        match self.ledger.as_mut() {
            Some(ledger) => ClubUpgradeOutcome::Transition(ledger.apply(event)),
            None => ClubUpgradeOutcome::NoUsage,
        }
    }

    pub fn consume(&mut self) -> ClubUpgradeOutcome {
        self.apply(UsageEvent::Consume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_upgrade_ignores_usage_events() {
        let mut upgrade = ClubUpgrade::new("Billiard Room", 3, 5).unwrap();
        assert!(!upgrade.has_usage());
        assert!(!upgrade.can_use());
        for event in [UsageEvent::Grant, UsageEvent::Consume, UsageEvent::Revoke] {
            assert_eq!(upgrade.apply(event), ClubUpgradeOutcome::NoUsage);
        }
    }

    #[test]
    fn upgrade_with_usage_behaves_like_a_ledger() {
        let mut upgrade = ClubUpgrade::new("Private Railcar", 6, 12)
            .unwrap()
            .with_usage(1)
            .unwrap();
        assert!(!upgrade.can_use());

        assert!(!upgrade.apply(UsageEvent::Grant).is_noop());
        assert!(upgrade.can_use());

        let outcome = upgrade.consume();
        assert!(outcome.is_fired());
        assert_eq!(outcome.transition().unwrap().after.used, 1);
        assert!(!upgrade.can_use());
        assert!(upgrade.consume().is_noop());
    }

    #[test]
    fn negative_requirements_are_rejected() {
        assert!(ClubUpgrade::new("Folly", -1, 0).is_err());
        assert!(ClubUpgrade::new("Folly", 0, -5).is_err());
        assert!(ClubUpgrade::new("Folly", 0, 0).unwrap().with_usage(-2).is_err());
    }

    #[test]
    fn blank_extra_requirement_is_dropped() {
        let upgrade = ClubUpgrade::new("Observatory", 8, 20)
            .unwrap()
            .with_extra_requirement("  ");
        assert_eq!(upgrade.extra_requirement, None);
    }
}
