// Persistence boundary: a key-value blob store holding the serialized
// journey library under one named slot.

use crate::model::{Journey, is_assigned};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_SLOT: &str = "journeys";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed journey data: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Opaque blob storage addressed by slot name.
pub trait BlobStore {
    /// `Ok(None)` when the slot has never been written.
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, slot: &str, blob: &str) -> Result<(), StorageError>;
}

/// One `<slot>.json` file per slot under a base directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base: PathBuf,
}

impl FileBlobStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.base.join(format!("{slot}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(slot)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn write(&mut self, slot: &str, blob: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base)?;
        fs::write(self.path_for(slot), blob)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slots: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, blob: &str) -> Result<(), StorageError> {
        self.slots.insert(slot.to_string(), blob.to_string());
        Ok(())
    }
}

/// Reads and writes the whole journey library as one JSON array.
///
/// `load` and `save` never fail: errors are logged and degrade to an empty
/// library or a skipped write. `try_load` and `try_save` expose them.
pub struct JourneyRepository {
    store: Box<dyn BlobStore>,
    slot: String,
}

impl JourneyRepository {
    pub fn new(store: Box<dyn BlobStore>) -> Self {
        Self::with_slot(store, DEFAULT_SLOT)
    }

    pub fn with_slot(store: Box<dyn BlobStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBlobStore::new()))
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn try_load(&self) -> Result<Vec<Journey>, StorageError> {
        match self.store.read(&self.slot)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn load(&self) -> Vec<Journey> {
        match self.try_load() {
            Ok(journeys) => {
                debug!(slot = %self.slot, count = journeys.len(), "journeys loaded");
                journeys
            }
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "could not load journeys, starting empty");
                Vec::new()
            }
        }
    }

    pub fn try_save(&mut self, journeys: &[Journey]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(journeys)?;
        self.store.write(&self.slot, &blob)
    }

    pub fn save(&mut self, journeys: &[Journey]) {
        if let Err(e) = self.try_save(journeys) {
            warn!(slot = %self.slot, error = %e, "could not save journeys");
        }
    }

    /// Insert or replace `journey` (matched by assigned id) and persist the
    /// library. Returns the library as written.
    pub fn try_save_journey(
        &mut self,
        journey: &Journey,
    ) -> Result<Vec<Journey>, StorageError> {
        let mut journeys = self.try_load()?;
        let existing = if is_assigned(&journey.id) {
            journeys.iter().position(|j| j.id == journey.id)
        } else {
            None
        };
        match existing {
            Some(index) => journeys[index] = journey.clone(),
            None => journeys.push(journey.clone()),
        }
        self.try_save(&journeys)?;
        debug!(slot = %self.slot, id = %journey.id, "journey saved");
        Ok(journeys)
    }

    pub fn save_journey(&mut self, journey: &Journey) -> Vec<Journey> {
        self.try_save_journey(journey).unwrap_or_else(|e| {
            warn!(slot = %self.slot, error = %e, "could not save journey");
            self.load()
        })
    }

    /// Remove every journey with `id` and persist the library.
    pub fn try_remove_journey(
        &mut self,
        id: &str,
    ) -> Result<Vec<Journey>, StorageError> {
        let mut journeys = self.try_load()?;
        let before = journeys.len();
        journeys.retain(|j| j.id != id);
        if journeys.len() != before {
            self.try_save(&journeys)?;
        }
        Ok(journeys)
    }

    pub fn remove_journey(&mut self, id: &str) -> Vec<Journey> {
        self.try_remove_journey(id).unwrap_or_else(|e| {
            warn!(slot = %self.slot, error = %e, "could not remove journey");
            self.load()
        })
    }
}

/// Pretty JSON document for a single journey.
pub fn export_journey(journey: &Journey) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(journey)?)
}

pub fn import_journey(json: &str) -> Result<Journey, StorageError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewNode, NodeType};

    struct BrokenStore;

    impl BlobStore for BrokenStore {
        fn read(&self, _slot: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn write(&mut self, _slot: &str, _blob: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn named(id: &str, name: &str) -> Journey {
        let mut journey = Journey::empty();
        journey.id = id.to_string();
        journey.name = name.to_string();
        journey
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let repo = JourneyRepository::in_memory();
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let mut store = MemoryBlobStore::new();
        store.write(DEFAULT_SLOT, "{not json").unwrap();
        let repo = JourneyRepository::new(Box::new(store));
        assert!(matches!(repo.try_load(), Err(StorageError::Serde(_))));
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_unavailable_store_degrades() {
        let mut repo = JourneyRepository::new(Box::new(BrokenStore));
        assert!(repo.load().is_empty());
        repo.save(&[named("a", "A")]);
        assert!(matches!(
            repo.try_save(&[]),
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn test_save_journey_upserts() {
        let mut repo = JourneyRepository::in_memory();
        repo.save_journey(&named("a", "First"));
        repo.save_journey(&named("b", "Second"));
        let library = repo.save_journey(&named("a", "Renamed"));

        assert_eq!(library.len(), 2);
        assert_eq!(library[0].name, "Renamed");
        assert_eq!(repo.load(), library);

        repo.save_journey(&named("", "Draft"));
        let library = repo.save_journey(&named("", "Draft 2"));
        assert_eq!(library.len(), 4, "unassigned journeys are appended");
    }

    #[test]
    fn test_save_journey_reports_broken_store() {
        let mut repo = JourneyRepository::new(Box::new(BrokenStore));
        assert!(repo.try_save_journey(&named("a", "A")).is_err());
        assert!(repo.save_journey(&named("a", "A")).is_empty());
        assert!(repo.try_remove_journey("a").is_err());
    }

    #[test]
    fn test_remove_journey() {
        let mut repo = JourneyRepository::in_memory();
        repo.save(&[named("a", "A"), named("b", "B")]);
        let library = repo.remove_journey("a");
        assert_eq!(library.len(), 1);
        assert_eq!(repo.load()[0].id, "b");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("data"));
        let mut repo = JourneyRepository::new(Box::new(store));
        assert!(repo.try_load().unwrap().is_empty());

        let mut journey = named("j1", "Checkout");
        let mut node = NewNode::new("Start", NodeType::Start).into_node();
        node.id = "s".to_string();
        node.x = Some(10.0);
        journey.nodes.push(node);
        repo.save(std::slice::from_ref(&journey));

        assert!(dir.path().join("data").join("journeys.json").exists());
        assert_eq!(repo.try_load().unwrap(), vec![journey]);
    }

    #[test]
    fn test_export_import() {
        let journey = named("j1", "Export me");
        let json = export_journey(&journey).unwrap();
        assert!(json.contains("\"isActive\""));
        assert_eq!(import_journey(&json).unwrap(), journey);
        assert!(import_journey("[]").is_err());
    }
}
