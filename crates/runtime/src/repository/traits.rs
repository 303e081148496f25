//! Repository contract for saving and loading sheets and their items.

use super::error::Result;
use super::types::{ActorId, CharacterRecord, ClubRecord, ItemId, ItemRecord};

/// Persistence collaborator for characters, clubs and owned items.
///
/// Loads return `Ok(None)` for unknown ids; the session turns that into a
/// lookup error with context.
pub trait SheetRepository: Send + Sync {
    fn load_character(&self, id: ActorId) -> Result<Option<CharacterRecord>>;

    fn save_character(&self, record: &CharacterRecord) -> Result<()>;

    fn load_club(&self, id: ActorId) -> Result<Option<ClubRecord>>;

    fn save_club(&self, record: &ClubRecord) -> Result<()>;

    fn load_item(&self, id: ItemId) -> Result<Option<ItemRecord>>;

    fn save_item(&self, id: ItemId, item: &ItemRecord) -> Result<()>;

    /// Remove an item. Removing an unknown id is not an error.
    fn delete_item(&self, id: ItemId) -> Result<()>;

    /// Reserve an id for a new item.
    fn next_item_id(&self) -> Result<ItemId>;

    /// Load several items, skipping ids with no stored record.
    fn load_items(&self, ids: &[ItemId]) -> Result<Vec<(ItemId, ItemRecord)>> {
        let mut items = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(item) = self.load_item(id)? {
                items.push((id, item));
            }
        }
        Ok(items)
    }
}
