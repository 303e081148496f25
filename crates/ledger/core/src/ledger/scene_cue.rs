//! Scene cues: limited-use narrative prompts.

use arrayvec::ArrayVec;

use super::{LedgerTransition, UsageEvent, UsageLedger};
use crate::error::ConfigError;
use crate::tracks::StandingDelta;

/// Opaque reference to a random table owned by the host.
///
/// The ledger only forwards it; drawing from the table is the host's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TableRef(String);

impl TableRef {
    /// Parses a table reference, treating blank input as "no table".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TableRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maximum number of extra items a scene cue carries.
pub const MAX_EXTRA_ITEMS: usize = 3;

/// Extra items attached to a scene cue.
pub type ExtraItems = ArrayVec<String, MAX_EXTRA_ITEMS>;

/// Side effects a fired scene cue asks the caller to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneCueEffects {
    /// Delta for the owning character's social standing track.
    pub standing_delta: StandingDelta,
    /// Table to draw from, forwarded to the table collaborator.
    pub table: Option<TableRef>,
}

impl SceneCueEffects {
    /// The standing change to apply, if any.
    pub fn standing_change(&self) -> Option<i32> {
        match self.standing_delta {
            StandingDelta::Unchanged => None,
            delta => Some(delta.value()),
        }
    }
}

/// Result of firing an event at a scene cue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneCueOutcome {
    pub transition: LedgerTransition,
    /// Present only when a use was actually consumed.
    pub effects: Option<SceneCueEffects>,
}

impl SceneCueOutcome {
    pub fn is_fired(&self) -> bool {
        self.effects.is_some()
    }

    pub fn is_noop(&self) -> bool {
        self.transition.is_noop()
    }
}

/// A limited-use narrative prompt owned by one character.
///
/// The social standing delta and the influence table are fixed when the cue
/// is defined. Consuming the cue reports them through [`SceneCueEffects`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneCue {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub standing_delta: StandingDelta,
    #[cfg_attr(feature = "serde", serde(default))]
    pub influence: Option<TableRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_items: ExtraItems,
    ledger: UsageLedger,
}

impl SceneCue {
    /// Creates a cue with an empty ledger of `max_usage` uses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if `max_usage` is negative.
    pub fn new(name: impl Into<String>, max_usage: i32) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.into(),
            standing_delta: StandingDelta::Unchanged,
            influence: None,
            extra_items: ExtraItems::new(),
            ledger: UsageLedger::new(max_usage)?,
        })
    }

    #[must_use]
    pub fn with_standing_delta(mut self, delta: StandingDelta) -> Self {
        self.standing_delta = delta;
        self
    }

    #[must_use]
    pub fn with_influence(mut self, table: TableRef) -> Self {
        self.influence = Some(table);
        self
    }

    /// Attaches an extra item.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] when the cue already
    /// carries [`MAX_EXTRA_ITEMS`] items.
    pub fn with_extra_item(mut self, item: impl Into<String>) -> Result<Self, ConfigError> {
        self.extra_items
            .try_push(item.into())
            .map_err(|_| ConfigError::InvalidConfiguration {
                field: "extra_items",
                value: MAX_EXTRA_ITEMS as i32 + 1,
                reason: "a scene cue carries at most three extra items",
            })?;
        Ok(self)
    }

    /// Replaces the ledger with persisted counters.
    #[must_use]
    pub fn with_ledger(mut self, ledger: UsageLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn has_extra_items(&self) -> bool {
        !self.extra_items.is_empty()
    }

    /// Fires `event` at the cue's ledger.
    ///
    /// Only a consumption that actually spends a use carries effects.
    pub fn apply(&mut self, event: UsageEvent) -> SceneCueOutcome {
        let transition = self.ledger.apply(event);
        let fired = event == UsageEvent::Consume && !transition.is_noop();
        SceneCueOutcome {
            transition,
            effects: fired.then(|| SceneCueEffects {
                standing_delta: self.standing_delta,
                table: self.influence.clone(),
            }),
        }
    }

    pub fn consume(&mut self) -> SceneCueOutcome {
        self.apply(UsageEvent::Consume)
    }

    pub fn grant(&mut self) -> SceneCueOutcome {
        self.apply(UsageEvent::Grant)
    }

    pub fn revoke(&mut self) -> SceneCueOutcome {
        self.apply(UsageEvent::Revoke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scandalous_cue() -> SceneCue {
        SceneCue::new("Spill the Punch", 3)
            .unwrap()
            .with_standing_delta(StandingDelta::Scandal)
            .with_influence(TableRef::parse("RollTable.gossip").unwrap())
    }

    #[test]
    fn consume_after_grant_fires_with_effects() {
        let mut cue = scandalous_cue();
        let granted = cue.grant();
        assert!(!granted.is_fired());
        assert!(!granted.is_noop());

        let outcome = cue.consume();
        assert!(outcome.is_fired());
        let effects = outcome.effects.unwrap();
        assert_eq!(effects.standing_change(), Some(1));
        assert_eq!(effects.table.unwrap().as_str(), "RollTable.gossip");
        assert_eq!(cue.ledger().used(), 1);
    }

    #[test]
    fn consume_without_available_use_carries_no_effects() {
        let mut cue = scandalous_cue();
        let outcome = cue.consume();
        assert!(outcome.is_noop());
        assert!(outcome.effects.is_none());
    }

    #[test]
    fn neutral_cue_reports_no_standing_change() {
        let mut cue = SceneCue::new("Polite Applause", 1).unwrap();
        cue.grant();
        let effects = cue.consume().effects.unwrap();
        assert_eq!(effects.standing_change(), None);
        assert_eq!(effects.table, None);
    }

    #[test]
    fn extra_items_are_capped_at_three() {
        let cue = SceneCue::new("Grand Entrance", 2)
            .unwrap()
            .with_extra_item("Top Hat")
            .and_then(|cue| cue.with_extra_item("Monocle"))
            .and_then(|cue| cue.with_extra_item("Cane"))
            .unwrap();
        assert!(cue.has_extra_items());
        assert!(cue.with_extra_item("Spats").is_err());
    }

    #[test]
    fn blank_table_reference_means_no_table() {
        assert_eq!(TableRef::parse("   "), None);
        assert_eq!(TableRef::parse(" abc ").unwrap().to_string(), "abc");
    }
}
