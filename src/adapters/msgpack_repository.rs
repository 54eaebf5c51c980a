//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use tracing::info;

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// MessagePack-based table repository.
///
/// # Examples
///
/// ```no_run
/// use castle_escape::adapters::MsgPackRepository;
/// use castle_escape::ports::TableRepository;
/// use castle_escape::q_learning::{QTable, SavedQTable, TrainerKind, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedQTable::new(TrainerKind::Guided, QTable::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("q_table.msgpack"))?;
/// let loaded = repo.load(Path::new("q_table.msgpack"))?;
/// # Ok::<(), castle_escape::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, saved).map_err(|e| Error::MalformedArtifact {
            message: format!("failed to encode table: {e}"),
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush {}", path.display()),
            source,
        })?;

        info!(
            path = %path.display(),
            states = saved.table().len(),
            algorithm = %saved.algorithm,
            "saved Q-table"
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => Error::ArtifactNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io {
                operation: format!("open file {}", path.display()),
                source,
            },
        })?;

        let saved: SavedQTable = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::MalformedArtifact {
                message: format!("{}: {e}", path.display()),
            },
        )?;
        saved.check_version()?;

        info!(
            path = %path.display(),
            states = saved.table().len(),
            algorithm = %saved.algorithm,
            "loaded Q-table"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        encoding::StateIndex,
        q_learning::{QTable, TrainerKind, TrainingMetadata},
        types::Action,
    };

    fn sample_table() -> SavedQTable {
        let mut table = QTable::new();
        table.update(StateIndex::new(374).unwrap(), Action::Fight, 12.0);
        SavedQTable::new(TrainerKind::Baseline, table, TrainingMetadata::default())
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("q_table.msgpack");

        let repo = MsgPackRepository::new();
        let saved = sample_table();
        repo.save(&saved, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_nonexistent_reports_missing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let repo = MsgPackRepository::new();
        let result = repo.load(&temp_dir.path().join("nothing_here.msgpack"));
        assert!(matches!(result, Err(Error::ArtifactNotFound { .. })));
    }

    #[test]
    fn test_load_garbage_reports_malformed_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("garbage.msgpack");
        std::fs::write(&file_path, b"\xc1\xc1\xc1").unwrap();

        let repo = MsgPackRepository::new();
        assert!(matches!(
            repo.load(&file_path),
            Err(Error::MalformedArtifact { .. })
        ));
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = MsgPackRepository::new();
        let result = repo.save(
            &sample_table(),
            &temp_dir.path().join("missing_dir").join("file.msgpack"),
        );
        assert!(result.is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_write_failure_on_full_device() {
        let repo = MsgPackRepository::new();
        let result = repo.save(&sample_table(), Path::new("/dev/full"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
