//! Mapping of sheet clicks to rule events.
//!
//! Sheets overload a single click target: a plain click acts, modifier keys
//! adjust. The two conventions differ in which modifier wins when both are
//! held, so each is captured here once.

use crate::ledger::UsageEvent;

/// Modifier keys held during a sheet click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClickModifiers {
    pub shift: bool,
    pub alt: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        alt: true,
    };
}

impl UsageEvent {
    /// Shift grants a use, alt revokes one, a plain click consumes.
    ///
    /// Shift wins when both are held.
    pub const fn from_modifiers(modifiers: ClickModifiers) -> Self {
        if modifiers.shift {
            Self::Grant
        } else if modifiers.alt {
            Self::Revoke
        } else {
            Self::Consume
        }
    }
}

impl From<ClickModifiers> for UsageEvent {
    fn from(modifiers: ClickModifiers) -> Self {
        Self::from_modifiers(modifiers)
    }
}

/// One-step adjustment of a sheet counter.
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
pub enum Nudge {
    Down,
    #[default]
    Hold,
    Up,
}

impl Nudge {
    /// Alt lowers, shift raises, a plain click holds.
    ///
    /// Alt wins when both are held.
    pub const fn from_modifiers(modifiers: ClickModifiers) -> Self {
        if modifiers.alt {
            Self::Down
        } else if modifiers.shift {
            Self::Up
        } else {
            Self::Hold
        }
    }

    pub const fn step(self) -> i32 {
        match self {
            Self::Down => -1,
            Self::Hold => 0,
            Self::Up => 1,
        }
    }
}

impl From<ClickModifiers> for Nudge {
    fn from(modifiers: ClickModifiers) -> Self {
        Self::from_modifiers(modifiers)
    }
}
