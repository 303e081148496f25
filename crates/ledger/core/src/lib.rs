//! Bounded usage ledgers and reputation tracks for social-club play.
//!
//! `ledger-core` holds the rules behind a character's limited-use scene cues,
//! a social club's upgrades, and the clamped counters (social standing,
//! renown, traits, status, luck coins) those items move. Everything here is a
//! pure value object: transitions return what happened and what the caller
//! should do next, and the caller performs persistence, narration and table
//! draws through the collaborator traits in [`env`].
pub mod character;
pub mod config;
pub mod counter;
pub mod env;
pub mod error;
pub mod input;
pub mod ledger;
pub mod tracks;
pub mod view;

pub use character::{
    Archetype, CharacterSheet, Flaw, RollGrade, SheetFields, TraitChange, TraitKey, TraitRoll,
    TraitScores,
};
pub use config::RulesConfig;
pub use counter::{ClampedCounter, CounterBounds};
pub use env::{
    EventNarrator, FixedConfirmer, LedgerEvent, NullDrawer, RequirementConfirmer, SilentNarrator,
    TableDrawer,
};
pub use error::{ConfigError, ErrorSeverity, LedgerError};
pub use input::{ClickModifiers, Nudge};
pub use ledger::{
    ClubUpgrade, ClubUpgradeOutcome, ExtraItems, LedgerFields, LedgerSnapshot, LedgerTransition,
    MAX_EXTRA_ITEMS, Outcome, SceneCue, SceneCueEffects, SceneCueOutcome, TableRef, UsageEvent,
    UsageLedger,
};
pub use tracks::{
    AcquisitionDecision, RenownTrack, SocialStandingTrack, Standing, StandingDelta,
    StandingReading, classify,
};
pub use view::{
    STANDING_PIPS, UsagePip, renown_pips, renown_pips_within, scene_cue_order, sort_scene_cues,
    standing_pips, standing_pips_within, usage_pips,
};
