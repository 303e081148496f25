//! Repository layer for sheets and the items they own.
//!
//! The rules crate never touches storage. Sessions load a record, let the rules
//! mutate it, and save it back through a [`SheetRepository`].

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileSheetRepository;
pub use memory::InMemorySheetRepository;
pub use traits::SheetRepository;
pub use types::{ActorId, CharacterRecord, ClubRecord, ItemId, ItemRecord};
