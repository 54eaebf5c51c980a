//! In-memory table repository for testing.
//!
//! Stores encoded artifacts in a shared map keyed by path so tests can
//! exercise the save/load cycle without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// All clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use castle_escape::adapters::InMemoryRepository;
/// use castle_escape::ports::TableRepository;
/// use castle_escape::q_learning::{QTable, SavedQTable, TrainerKind, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedQTable::new(TrainerKind::Baseline, QTable::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("trained"))?;
/// let loaded = repo.load(Path::new("trained"))?;
/// assert_eq!(loaded, saved);
/// # Ok::<(), castle_escape::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts currently stored.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Check if an artifact exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(&key(path))
    }

    /// Store raw bytes, bypassing encoding. Lets tests plant corrupt artifacts.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.lock().insert(key(path), bytes);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl TableRepository for InMemoryRepository {
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = saved.to_bytes()?;
        self.lock().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let bytes = self
            .lock()
            .get(&key(path))
            .cloned()
            .ok_or_else(|| Error::ArtifactNotFound {
                path: path.to_path_buf(),
            })?;
        SavedQTable::from_bytes(&bytes)
    }
}
