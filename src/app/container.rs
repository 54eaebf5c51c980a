//! Dependency injection container for the castle escape application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for trainers and trained-table artifacts.

use std::{
    path::Path,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use super::config::{BaselineConfig, GuidedConfig};
use crate::{
    Result,
    adapters::MsgPackRepository,
    pipeline::TrainingResult,
    ports::{TableRepository, Trainer},
    q_learning::{BaselineTrainer, GuidedTrainer, SavedQTable, TrainingMetadata},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use castle_escape::app::{App, GuidedConfig};
///
/// let app = App::new();
/// let trainer = app.create_guided(GuidedConfig::default().with_seed(42))?;
/// # Ok::<(), castle_escape::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use castle_escape::app::App;
/// use castle_escape::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for trained-table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for table persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Create a baseline trainer. A seed in the config wins over the app default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range values.
    pub fn create_baseline(&self, mut config: BaselineConfig) -> Result<BaselineTrainer> {
        config.seed = config.seed.or(self.default_seed);
        BaselineTrainer::new(&config)
    }

    /// Create a guided trainer. A seed in the config wins over the app default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range values.
    pub fn create_guided(&self, mut config: GuidedConfig) -> Result<GuidedTrainer> {
        config.seed = config.seed.or(self.default_seed);
        GuidedTrainer::new(config)
    }

    /// Snapshot a trainer's table together with its training provenance.
    pub fn snapshot(
        &self,
        trainer: &dyn Trainer,
        result: &TrainingResult,
        seed: Option<u64>,
    ) -> SavedQTable {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs());
        SavedQTable::new(
            trainer.kind(),
            trainer.q_table().clone(),
            TrainingMetadata {
                episodes: Some(result.total_episodes),
                successes: Some(result.successes),
                final_epsilon: Some(result.final_epsilon),
                seed: seed.or(self.default_seed),
                saved_at,
            },
        )
    }

    /// Persist a trained table.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use castle_escape::app::App;
    /// use castle_escape::q_learning::{QTable, SavedQTable, TrainerKind, TrainingMetadata};
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let saved = SavedQTable::new(TrainerKind::Guided, QTable::new(), TrainingMetadata::default());
    /// app.save_table(&saved, Path::new("q_table.msgpack"))?;
    /// # Ok::<(), castle_escape::Error>(())
    /// ```
    pub fn save_table(&self, saved: &SavedQTable, path: &Path) -> Result<()> {
        self.table_repository.save(saved, path)
    }

    /// Load a trained table.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ArtifactNotFound`] if nothing is stored at `path`,
    /// [`crate::Error::MalformedArtifact`] if it cannot be decoded.
    pub fn load_table(&self, path: &Path) -> Result<SavedQTable> {
        self.table_repository.load(path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            table_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all trainers created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
