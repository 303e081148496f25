//! Session runtime for social-club sheets.
//!
//! `ledger-runtime` wires the pure rules from `ledger-core` to persistence and
//! the host's collaborators:
//! - [`repository`]: where characters, clubs and their items live
//! - [`Session`]: load, apply, persist, narrate
//! - [`ChatLogNarrator`]: English chat lines for every applied outcome
//!
//! All logging goes through `tracing` under the `runtime::session`,
//! `runtime::repository` and `runtime::chat` targets. Installing a subscriber
//! is left to the host.
pub mod catalog;
pub mod error;
pub mod narrator;
pub mod repository;
pub mod session;

pub use catalog::Catalog;
pub use error::{Result, RuntimeError};
pub use narrator::ChatLogNarrator;
pub use repository::{
    ActorId, CharacterRecord, ClubRecord, FileSheetRepository, InMemorySheetRepository, ItemId,
    ItemRecord, RepositoryError, SheetRepository,
};
pub use session::{
    Acquisition, ArchetypeChange, ClubUpgradeRow, FlawChange, REPLACE_ARCHETYPE, REPLACE_FLAW,
    SceneCueReport, SceneCueRow, Session, SessionBuilder,
};
