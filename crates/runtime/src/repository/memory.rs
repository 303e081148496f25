//! In-memory SheetRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use super::error::{RepositoryError, Result};
use super::traits::SheetRepository;
use super::types::{ActorId, CharacterRecord, ClubRecord, ItemId, ItemRecord};

/// In-memory implementation of SheetRepository.
pub struct InMemorySheetRepository {
    characters: RwLock<HashMap<ActorId, CharacterRecord>>,
    clubs: RwLock<HashMap<ActorId, ClubRecord>>,
    items: RwLock<HashMap<ItemId, ItemRecord>>,
    next_item: AtomicU32,
}

impl InMemorySheetRepository {
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
            clubs: RwLock::new(HashMap::new()),
            items: RwLock::new(HashMap::new()),
            next_item: AtomicU32::new(1),
        }
    }
}

impl Default for InMemorySheetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetRepository for InMemorySheetRepository {
    fn load_character(&self, id: ActorId) -> Result<Option<CharacterRecord>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(&id).cloned())
    }

    fn save_character(&self, record: &CharacterRecord) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(record.id, record.clone());
        Ok(())
    }

    fn load_club(&self, id: ActorId) -> Result<Option<ClubRecord>> {
        let clubs = self
            .clubs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(clubs.get(&id).cloned())
    }

    fn save_club(&self, record: &ClubRecord) -> Result<()> {
        let mut clubs = self
            .clubs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        clubs.insert(record.id, record.clone());
        Ok(())
    }

    fn load_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        let items = self
            .items
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(items.get(&id).cloned())
    }

    fn save_item(&self, id: ItemId, item: &ItemRecord) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        items.insert(id, item.clone());
        // Keep reserved ids ahead of ids chosen by the caller.
        self.next_item.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        items.remove(&id);
        Ok(())
    }

    fn next_item_id(&self) -> Result<ItemId> {
        Ok(ItemId(self.next_item.fetch_add(1, Ordering::Relaxed)))
    }
}
