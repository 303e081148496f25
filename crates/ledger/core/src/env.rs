//! Collaborator boundaries.
//!
//! The rules never format text, draw from tables or ask anyone anything. They
//! describe what happened as a [`LedgerEvent`] and leave the rest to the host
//! through the traits below.

use crate::character::{TraitChange, TraitRoll};
use crate::ledger::{LedgerTransition, TableRef};
use crate::tracks::StandingReading;

/// Structured description of a rules outcome, handed to an [`EventNarrator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent<'a> {
    /// A scene cue's ledger changed. `standing` is set when consuming the
    /// cue moved the owner's social standing.
    SceneCue {
        name: &'a str,
        transition: LedgerTransition,
        standing: Option<StandingReading>,
    },
    /// A club upgrade's ledger changed.
    ClubUpgrade {
        name: &'a str,
        transition: LedgerTransition,
    },
    /// A club acquired an upgrade and paid for it.
    UpgradeAcquired {
        name: &'a str,
        cost: i32,
        funds_after: i32,
    },
    StandingAdjusted {
        before: StandingReading,
        after: StandingReading,
    },
    RenownAdjusted { before: i32, after: i32 },
    TraitAdjusted(TraitChange),
    TraitRolled(TraitRoll),
    StatusAdjusted { before: i32, after: i32 },
    LuckCoinsAdjusted { before: i32, after: i32 },
    /// A character took an archetype; `cleared` owned items were dropped.
    ArchetypeAssigned { name: &'a str, cleared: usize },
    /// A character took a flaw, possibly replacing `replaced`.
    FlawTaken {
        name: &'a str,
        replaced: Option<&'a str>,
    },
    FlawRemoved { name: &'a str },
}

/// Turns rules outcomes into user-facing messages (chat, log, ...).
pub trait EventNarrator {
    fn narrate(&mut self, event: &LedgerEvent<'_>);
}

/// Performs the random draw for a table forwarded by a fired scene cue.
pub trait TableDrawer {
    fn draw(&mut self, table: &TableRef);
}

/// Asks the game master to approve something about `subject`: an upgrade's
/// extra requirement, or replacing what a character already holds.
pub trait RequirementConfirmer {
    fn confirm(&mut self, subject: &str, requirement: &str) -> bool;
}

/// Narrator that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNarrator;

impl EventNarrator for SilentNarrator {
    fn narrate(&mut self, _event: &LedgerEvent<'_>) {}
}

/// Confirmer that always answers the same way.
#[derive(Clone, Copy, Debug)]
pub struct FixedConfirmer(pub bool);

impl RequirementConfirmer for FixedConfirmer {
    fn confirm(&mut self, _subject: &str, _requirement: &str) -> bool {
        self.0
    }
}

/// Table drawer for hosts without random tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDrawer;

impl TableDrawer for NullDrawer {
    fn draw(&mut self, _table: &TableRef) {}
}
