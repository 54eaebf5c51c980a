//! Serialization support for trained Q-tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::QTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainerKind {
    Baseline,
    Guided,
}

impl fmt::Display for TrainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerKind::Baseline => f.write_str("baseline"),
            TrainerKind::Guided => f.write_str("guided"),
        }
    }
}

/// Provenance recorded alongside a trained table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes: Option<usize>,
    /// Episodes counted as successful
    pub successes: Option<usize>,
    /// Exploration rate when training stopped
    pub final_epsilon: Option<f64>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Seconds since the Unix epoch when saved
    pub saved_at: Option<u64>,
}

/// Versioned, read-only artifact handed from training to evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub algorithm: TrainerKind,
    table: QTable,
    pub metadata: TrainingMetadata,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn new(algorithm: TrainerKind, table: QTable, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            algorithm,
            table,
            metadata,
        }
    }

    /// The stored table, read-only.
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Reject artifacts written by an incompatible format version.
    pub fn check_version(&self) -> Result<()> {
        if self.version == Self::VERSION {
            Ok(())
        } else {
            Err(Error::MalformedArtifact {
                message: format!(
                    "unsupported table format version {} (expected {})",
                    self.version,
                    Self::VERSION
                ),
            })
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::MalformedArtifact {
            message: format!("failed to encode table: {e}"),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let saved: SavedQTable =
            rmp_serde::from_slice(bytes).map_err(|e| Error::MalformedArtifact {
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }
}
