//! Optional JSON configuration file for the `train` command
//!
//! Every field is optional; missing sections fall back to the trainer
//! defaults. Command-line flags are applied on top of the file.
//!
//! ```json
//! {
//!   "training": { "num_episodes": 5000, "log_interval": 100 },
//!   "guided": { "learning_rate": 0.2, "max_steps": 150 }
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    app::{BaselineConfig, GuidedConfig},
    pipeline::TrainingConfig,
};

/// Configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub training: Option<TrainingSection>,
    pub baseline: BaselineConfig,
    pub guided: GuidedConfig,
}

/// Episode loop settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingSection {
    pub num_episodes: Option<usize>,
    pub seed: Option<u64>,
    pub log_interval: Option<usize>,
}

impl FileConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Episode loop settings with file values over defaults.
    pub fn training_config(&self) -> TrainingConfig {
        let mut config = TrainingConfig::default();
        if let Some(section) = &self.training {
            if let Some(episodes) = section.num_episodes {
                config.num_episodes = episodes;
            }
            if let Some(interval) = section.log_interval {
                config.log_interval = interval;
            }
            config.seed = section.seed;
        }
        config
    }
}
