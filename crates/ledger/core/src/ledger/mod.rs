//! Usage ledgers for limited-use items.
//!
//! A [`UsageLedger`] tracks how many uses of an item have been made available
//! and how many of those have been consumed. The item variants built on top of
//! it ([`SceneCue`], [`ClubUpgrade`]) attach the side effects a consumption
//! implies, but never apply them: they only return the instruction.
//!
//! ```text
//!            grant()                 consume()
//!   avail ──────────► avail + 1   used ──────────► used + 1   (if used < avail)
//!            revoke()
//!   avail ──────────► avail - 1, used = min(used, avail)
//! ```

mod club_upgrade;
mod scene_cue;

pub use club_upgrade::{ClubUpgrade, ClubUpgradeOutcome};
pub use scene_cue::{
    ExtraItems, MAX_EXTRA_ITEMS, SceneCue, SceneCueEffects, SceneCueOutcome, TableRef,
};

use bitflags::bitflags;

use crate::error::ConfigError;

/// Lifecycle event fired at a ledger.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UsageEvent {
    /// Spend one available use.
    #[default]
    Consume,
    /// Make one more use available, up to the item's capacity.
    Grant,
    /// Take one available use away.
    Revoke,
}

/// Whether a transition changed the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Applied,
    /// Nothing changed: a saturated grant/revoke or a consume with no use available.
    NoOp,
}

bitflags! {
    /// Tracks which persisted fields of a ledger changed during a transition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LedgerFields: u8 {
        const AVAILABLE_USAGE = 1 << 0;
        const USED            = 1 << 1;
    }
}

/// Plain copy of a ledger's three counters.
///
/// Also serves as the unvalidated wire form: deserializing a [`UsageLedger`]
/// goes through [`UsageLedger::restore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerSnapshot {
    pub max_usage: i32,
    pub available_usage: i32,
    pub used: i32,
}

/// Result of firing one event at a ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerTransition {
    pub event: UsageEvent,
    pub before: LedgerSnapshot,
    pub after: LedgerSnapshot,
}

impl LedgerTransition {
    pub fn outcome(&self) -> Outcome {
        if self.before == self.after {
            Outcome::NoOp
        } else {
            Outcome::Applied
        }
    }

    pub fn is_noop(&self) -> bool {
        self.outcome() == Outcome::NoOp
    }

    /// Fields the caller has to persist.
    pub fn changed_fields(&self) -> LedgerFields {
        let mut fields = LedgerFields::empty();
        if self.before.available_usage != self.after.available_usage {
            fields |= LedgerFields::AVAILABLE_USAGE;
        }
        if self.before.used != self.after.used {
            fields |= LedgerFields::USED;
        }
        fields
    }
}

/// Usage counters for one limited-use item.
///
/// # Invariant
///
/// `0 <= used <= available_usage <= max_usage` at every observable point.
/// `max_usage` is fixed when the item is defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LedgerSnapshot"))]
pub struct UsageLedger {
    max_usage: i32,
    available_usage: i32,
    used: i32,
}

impl UsageLedger {
    /// Creates an empty ledger: nothing available, nothing used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `max_usage` is negative.
    pub fn new(max_usage: i32) -> Result<Self, ConfigError> {
        Self::restore(max_usage, 0, 0)
    }

    /// Rebuilds a ledger from persisted values.
    ///
    /// Out-of-range counters are repaired by clamping `available_usage` into
    /// `[0, max_usage]` and then `used` into `[0, available_usage]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `max_usage` is negative.
    pub fn restore(max_usage: i32, available_usage: i32, used: i32) -> Result<Self, ConfigError> {
        if max_usage < 0 {
            return Err(ConfigError::negative_max_usage(max_usage));
        }
        let available_usage = available_usage.clamp(0, max_usage);
        let used = used.clamp(0, available_usage);
        Ok(Self {
            max_usage,
            available_usage,
            used,
        })
    }

    pub const fn max_usage(&self) -> i32 {
        self.max_usage
    }

    pub const fn available_usage(&self) -> i32 {
        self.available_usage
    }

    pub const fn used(&self) -> i32 {
        self.used
    }

    /// Uses that can still be consumed.
    pub const fn remaining(&self) -> i32 {
        self.available_usage - self.used
    }

    pub const fn can_consume(&self) -> bool {
        self.used < self.available_usage
    }

    pub const fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            max_usage: self.max_usage,
            available_usage: self.available_usage,
            used: self.used,
        }
    }

    /// Makes one more use available, saturating at `max_usage`.
    pub fn grant(&mut self) -> LedgerTransition {
        self.transition(UsageEvent::Grant, |ledger| {
            ledger.available_usage = ledger.available_usage.saturating_add(1).min(ledger.max_usage);
        })
    }

    /// Removes one available use, saturating at zero.
    ///
    /// Dropping capacity below what has been used also reduces `used`, so a
    /// revoked use that was already spent is lost with it.
    pub fn revoke(&mut self) -> LedgerTransition {
        self.transition(UsageEvent::Revoke, |ledger| {
            ledger.available_usage = (ledger.available_usage - 1).max(0);
            ledger.used = ledger.used.min(ledger.available_usage);
        })
    }

    /// Spends one available use.
    ///
    /// With nothing left to spend the ledger is untouched and the transition
    /// reports [`Outcome::NoOp`]; spurious attempts such as double clicks are
    /// not errors.
    pub fn consume(&mut self) -> LedgerTransition {
        self.transition(UsageEvent::Consume, |ledger| {
            if ledger.can_consume() {
                ledger.used += 1;
            }
        })
    }

    /// Dispatches `event` to the matching transition.
    pub fn apply(&mut self, event: UsageEvent) -> LedgerTransition {
        match event {
            UsageEvent::Consume => self.consume(),
            UsageEvent::Grant => self.grant(),
            UsageEvent::Revoke => self.revoke(),
        }
    }

    fn transition(&mut self, event: UsageEvent, mutate: impl FnOnce(&mut Self)) -> LedgerTransition {
        let before = self.snapshot();
        mutate(self);
        debug_assert!(
            0 <= self.used && self.used <= self.available_usage,
            "used out of range after {event}"
        );
        debug_assert!(
            self.available_usage <= self.max_usage,
            "available usage above capacity after {event}"
        );
        LedgerTransition {
            event,
            before,
            after: self.snapshot(),
        }
    }
}

impl TryFrom<LedgerSnapshot> for UsageLedger {
    type Error = ConfigError;

    fn try_from(snapshot: LedgerSnapshot) -> Result<Self, Self::Error> {
        Self::restore(snapshot.max_usage, snapshot.available_usage, snapshot.used)
    }
}

impl From<UsageLedger> for LedgerSnapshot {
    fn from(ledger: UsageLedger) -> Self {
        ledger.snapshot()
    }
}
