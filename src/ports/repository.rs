//! Repository port for trained-table persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading trained Q-table artifacts.
///
/// # Examples
///
/// ```no_run
/// use castle_escape::ports::TableRepository;
/// use castle_escape::q_learning::SavedQTable;
/// use std::path::Path;
///
/// fn archive<R: TableRepository>(repo: &R, saved: &SavedQTable) -> castle_escape::Result<()> {
///     repo.save(saved, Path::new("q_table.msgpack"))
/// }
/// ```
pub trait TableRepository {
    /// Save an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()>;

    /// Load an artifact.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ArtifactNotFound`] when nothing is stored at `path`
    /// - [`crate::Error::MalformedArtifact`] when the bytes cannot be decoded
    ///   or carry an unsupported version
    fn load(&self, path: &Path) -> Result<SavedQTable>;
}
