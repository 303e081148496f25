//! File-based SheetRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{RepositoryError, Result};
use super::traits::SheetRepository;
use super::types::{ActorId, CharacterRecord, ClubRecord, ItemId, ItemRecord};

/// File-based implementation of SheetRepository.
///
/// # Directory Structure
///
/// ```text
/// base_dir/
/// ├── characters/{id}.json
/// ├── clubs/{id}.json
/// └── items/{id}.json
/// ```
///
/// Each record is written to a temp file and renamed into place.
pub struct FileSheetRepository {
    base_dir: PathBuf,
    next_item: Mutex<Option<u32>>,
}

impl FileSheetRepository {
    /// Create a repository rooted at `base_dir`, creating the directories.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        for kind in ["characters", "clubs", "items"] {
            fs::create_dir_all(base_dir.join(kind)).map_err(RepositoryError::Io)?;
        }
        Ok(Self {
            base_dir,
            next_item: Mutex::new(None),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, kind: &str, id: u32) -> PathBuf {
        self.base_dir.join(kind).join(format!("{}.json", id))
    }

    fn write<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec_pretty(record).map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, path).map_err(RepositoryError::Io)?;

        tracing::debug!(target: "runtime::repository", path = %path.display(), "saved record");
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(RepositoryError::Io)?;
        let record = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::Json(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(target: "runtime::repository", path = %path.display(), "loaded record");
        Ok(Some(record))
    }

    /// Highest item id currently on disk.
    fn scan_max_item_id(&self) -> Result<u32> {
        let mut max = 0;
        for entry in fs::read_dir(self.base_dir.join("items")).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok())
                .ok_or_else(|| {
                    RepositoryError::CorruptedData(format!(
                        "unexpected item file {}",
                        path.display()
                    ))
                })?;
            max = max.max(id);
        }
        Ok(max)
    }
}

impl SheetRepository for FileSheetRepository {
    fn load_character(&self, id: ActorId) -> Result<Option<CharacterRecord>> {
        self.read(&self.record_path("characters", id.0))
    }

    fn save_character(&self, record: &CharacterRecord) -> Result<()> {
        self.write(&self.record_path("characters", record.id.0), record)
    }

    fn load_club(&self, id: ActorId) -> Result<Option<ClubRecord>> {
        self.read(&self.record_path("clubs", id.0))
    }

    fn save_club(&self, record: &ClubRecord) -> Result<()> {
        self.write(&self.record_path("clubs", record.id.0), record)
    }

    fn load_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        self.read(&self.record_path("items", id.0))
    }

    fn save_item(&self, id: ItemId, item: &ItemRecord) -> Result<()> {
        self.write(&self.record_path("items", id.0), item)
    }

    fn delete_item(&self, id: ItemId) -> Result<()> {
        let path = self.record_path("items", id.0);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(target: "runtime::repository", path = %path.display(), "deleted record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    fn next_item_id(&self) -> Result<ItemId> {
        let mut next = self
            .next_item
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let candidate = match *next {
            Some(id) => id,
            None => self.scan_max_item_id()?.saturating_add(1),
        };
        // Another writer may have saved items since the last scan.
        let mut id = candidate;
        while self.record_path("items", id).exists() {
            id = id.saturating_add(1);
        }
        *next = Some(id.saturating_add(1));
        Ok(ItemId(id))
    }
}

#[cfg(test)]
mod tests {
    use ledger_core::{CharacterSheet, ClubUpgrade, Flaw, RenownTrack, SceneCue, UsageEvent};

    use super::*;

    #[test]
    fn records_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();

        let mut sheet = CharacterSheet::default();
        sheet.adjust_standing(-3);
        let mut character = CharacterRecord::new(ActorId(1), "Cornelius", sheet);
        character.scene_cues.push(ItemId(4));
        repo.save_character(&character).unwrap();

        let club = ClubRecord::new(ActorId(2), "The Explorers", RenownTrack::new(5), 12);
        repo.save_club(&club).unwrap();

        let mut cue = SceneCue::new("Faint", 2).unwrap();
        cue.apply(UsageEvent::Grant);
        let item = ItemRecord::SceneCue(cue);
        repo.save_item(ItemId(4), &item).unwrap();

        assert_eq!(repo.load_character(ActorId(1)).unwrap(), Some(character));
        assert_eq!(repo.load_club(ActorId(2)).unwrap(), Some(club));
        assert_eq!(repo.load_item(ItemId(4)).unwrap(), Some(item));
    }

    #[test]
    fn missing_records_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        assert!(repo.load_character(ActorId(9)).unwrap().is_none());
    }

    #[test]
    fn next_item_id_continues_after_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        let upgrade = ItemRecord::ClubUpgrade(ClubUpgrade::new("Library", 1, 2).unwrap());
        repo.save_item(ItemId(3), &upgrade).unwrap();

        let reopened = FileSheetRepository::new(dir.path()).unwrap();
        assert_eq!(reopened.next_item_id().unwrap(), ItemId(4));
        assert_eq!(reopened.next_item_id().unwrap(), ItemId(5));
    }

    #[test]
    fn out_of_range_persisted_ledger_is_repaired_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        std::fs::write(
            dir.path().join("items").join("1.json"),
            r#"{"kind":"scene_cue","name":"Gossip","ledger":{"max_usage":2,"available_usage":5,"used":4}}"#,
        )
        .unwrap();

        let Some(ItemRecord::SceneCue(cue)) = repo.load_item(ItemId(1)).unwrap() else {
            panic!("expected a scene cue");
        };
        assert_eq!(cue.ledger().available_usage(), 2);
        assert_eq!(cue.ledger().used(), 2);
    }

    #[test]
    fn persisted_tracks_cannot_widen_their_range() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        std::fs::write(
            dir.path().join("characters").join("1.json"),
            r#"{"id":1,"name":"Cornelius","sheet":{"traits":{"bp":1,"ce":1,"ws":1,"cp":1},"status":9,"luck_coins":-4,"social_standing":40}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("clubs").join("2.json"),
            r#"{"id":2,"name":"The Explorers","renown":99,"funds":3}"#,
        )
        .unwrap();

        let mut character = repo.load_character(ActorId(1)).unwrap().unwrap();
        let standing = character.sheet.social_standing();
        assert_eq!(standing.value(), 10);
        assert_eq!(standing.bounds(), ledger_core::CounterBounds::SOCIAL_STANDING);
        assert_eq!(character.sheet.adjust_standing(5).value, 10);
        assert_eq!(character.sheet.status(), 3);
        assert_eq!(character.sheet.luck_coins(), 0);

        let mut club = repo.load_club(ActorId(2)).unwrap().unwrap();
        assert_eq!(club.renown.value(), 15);
        assert_eq!(club.renown.adjust(1), 15);
    }

    #[test]
    fn bounds_written_beside_a_track_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        std::fs::write(
            dir.path().join("clubs").join("2.json"),
            r#"{"id":2,"name":"The Explorers","renown":{"value":40,"min":0,"max":100},"funds":3}"#,
        )
        .unwrap();
        assert!(matches!(
            repo.load_club(ActorId(2)),
            Err(RepositoryError::Json(_))
        ));
    }

    #[test]
    fn tracks_are_saved_as_bare_values() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        let club = ClubRecord::new(ActorId(2), "The Explorers", RenownTrack::new(5), 12);
        repo.save_club(&club).unwrap();

        let json: serde_json::Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("clubs").join("2.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["renown"], serde_json::json!(5));
    }

    #[test]
    fn deleting_an_item_removes_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        repo.save_item(ItemId(1), &ItemRecord::Flaw(Flaw::new("Vain")))
            .unwrap();

        repo.delete_item(ItemId(1)).unwrap();
        assert!(repo.load_item(ItemId(1)).unwrap().is_none());
        assert!(repo.delete_item(ItemId(1)).is_ok());
    }

    #[test]
    fn garbage_is_reported_as_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSheetRepository::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("clubs").join("1.json"), "not json").unwrap();
        assert!(matches!(
            repo.load_club(ActorId(1)),
            Err(RepositoryError::Json(_))
        ));
    }
}
