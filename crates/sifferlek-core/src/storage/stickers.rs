//! Versioned sticker collection persistence.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::stickers::StickerCollection;

use super::StorageMedium;

/// Storage key for the sticker collection.
const STICKERS_KEY: &str = "stickers";
/// Current schema version tag.
const CURRENT_VERSION: &str = "v1";

/// On-disk shape: the collection plus its version tag.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCollection {
    version: String,
    #[serde(flatten)]
    collection: StickerCollection,
}

/// Load/save gateway for [`StickerCollection`].
#[derive(Debug)]
pub struct StickerStore<M: StorageMedium> {
    medium: M,
}

impl<M: StorageMedium> StickerStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Load the collection, falling back to a fresh one on a missing,
    /// corrupt, or differently versioned record. Never fails.
    pub fn load(&self) -> StickerCollection {
        let Some(raw) = self.medium.get(STICKERS_KEY) else {
            return StickerCollection::new();
        };
        match serde_json::from_str::<StoredCollection>(&raw) {
            // A collection always holds at least one board; a record
            // without any would panic board lookups downstream.
            Ok(stored) if stored.version == CURRENT_VERSION => {
                if stored.collection.boards.is_empty() {
                    eprintln!("Warning: sticker record has no boards, resetting");
                    StickerCollection::new()
                } else {
                    stored.collection
                }
            }
            Ok(_) => StickerCollection::new(),
            Err(e) => {
                eprintln!("Warning: corrupt sticker collection, resetting: {e}");
                StickerCollection::new()
            }
        }
    }

    /// Persist the collection under the current version tag.
    pub fn save(&mut self, collection: &StickerCollection) -> Result<(), StorageError> {
        let stored = StoredCollection {
            version: CURRENT_VERSION.to_string(),
            collection: collection.clone(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|source| {
            StorageError::SerializeFailed {
                key: STICKERS_KEY.to_string(),
                source,
            }
        })?;
        self.medium.set(STICKERS_KEY, &json)
    }

    /// Load, apply a mutation, and persist. Returns the closure's result;
    /// a failed write keeps the in-memory result but reports the error.
    pub fn update<R>(
        &mut self,
        mutate: impl FnOnce(&mut StickerCollection) -> R,
    ) -> Result<R, StorageError> {
        let mut collection = self.load();
        let result = mutate(&mut collection);
        self.save(&collection)?;
        Ok(result)
    }

    /// Record an earned sticker (idempotent).
    pub fn add_earned(&mut self, sticker_id: &str) -> Result<(), StorageError> {
        self.update(|c| c.add_earned(sticker_id))
    }

    /// Place an earned sticker at an explicit position.
    pub fn place(
        &mut self,
        sticker_id: &str,
        board_index: usize,
        row: usize,
        col: usize,
    ) -> Result<bool, StorageError> {
        self.update(|c| c.place(sticker_id, board_index, row, col))
    }

    /// Grant a sticker and auto-place it into the first empty slot,
    /// opening a new board if the active one is full.
    pub fn grant_and_place(
        &mut self,
        sticker_id: &str,
    ) -> Result<Option<(usize, usize, usize)>, StorageError> {
        self.update(|c| {
            c.add_earned(sticker_id);
            c.place_in_first_empty(sticker_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryMedium;

    fn store() -> StickerStore<MemoryMedium> {
        StickerStore::new(MemoryMedium::new())
    }

    #[test]
    fn missing_record_yields_fresh_collection() {
        let s = store();
        let c = s.load();
        assert!(c.earned.is_empty());
        assert_eq!(c.boards.len(), 1);
    }

    #[test]
    fn corrupt_record_resets() {
        let mut medium = MemoryMedium::new();
        medium.set(STICKERS_KEY, "[broken").unwrap();
        let s = StickerStore::new(medium);
        assert_eq!(s.load(), StickerCollection::new());
    }

    #[test]
    fn save_load_round_trips() {
        let mut s = store();
        let mut c = StickerCollection::new();
        c.add_earned("cat");
        c.mark_milestone_reached("first_round");
        assert!(c.place("cat", 0, 1, 2));
        s.save(&c).unwrap();

        let loaded = s.load();
        assert_eq!(loaded, c);
        assert!(loaded.milestone_reached("first_round"));
    }

    #[test]
    fn grant_and_place_lands_in_first_empty_slot() {
        let mut s = store();
        let spot = s.grant_and_place("cat").unwrap();
        assert_eq!(spot, Some((0, 0, 0)));
        let spot = s.grant_and_place("dog").unwrap();
        assert_eq!(spot, Some((0, 0, 1)));
        let loaded = s.load();
        assert_eq!(loaded.earned, vec!["cat", "dog"]);
    }

    #[test]
    fn record_without_boards_resets() {
        let mut medium = MemoryMedium::new();
        medium
            .set(
                STICKERS_KEY,
                r#"{"version":"v1","earned":["cat"],"boards":[],"current_board_index":0,"milestones_reached":[]}"#,
            )
            .unwrap();
        let s = StickerStore::new(medium);
        let c = s.load();
        assert_eq!(c, StickerCollection::new());
        // The reset collection supports board lookups again.
        assert!(!c.is_active_board_full());
    }

    #[test]
    fn unknown_version_resets() {
        let mut s = store();
        let mut c = StickerCollection::new();
        c.add_earned("cat");
        s.save(&c).unwrap();
        // Tamper with the version tag.
        let raw = s.medium.get(STICKERS_KEY).unwrap().replace("\"v1\"", "\"v9\"");
        s.medium.set(STICKERS_KEY, &raw).unwrap();
        assert!(s.load().earned.is_empty());
    }
}
