//! Training pipeline for tabular trainers

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    ports::{Environment, Observer, Trainer},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Random seed applied to the trainer before the first episode
    pub seed: Option<u64>,

    /// Emit a progress log line every this many episodes (0 disables)
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 2_000,
            seed: None,
            log_interval: 50,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played
    pub total_episodes: usize,

    /// Episodes that terminated with positive total reward
    pub successes: usize,

    /// Episodes abandoned at the step cap
    pub truncated: usize,

    /// Success rate
    pub success_rate: f64,

    /// Mean accumulated reward per episode
    pub mean_reward: f64,

    /// Exploration rate after the last decay
    pub final_epsilon: f64,

    /// States with a Q-table row
    pub table_size: usize,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs a trainer for a fixed number of episodes and reports to observers.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run every episode once, in order. Nothing is retried.
    pub fn run(
        &mut self,
        trainer: &mut dyn Trainer,
        env: &mut dyn Environment,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            trainer.set_rng_seed(seed);
        }

        let total = self.config.num_episodes;
        let mut successes = 0;
        let mut truncated = 0;
        let mut reward_sum = 0.0;

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        for episode in 0..total {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            if self.config.log_interval > 0 && episode % self.config.log_interval == 0 {
                let rate = if episode > 0 {
                    successes as f64 / episode as f64 * 100.0
                } else {
                    0.0
                };
                info!(
                    "Episode {episode}/{total}, success rate: {rate:.1}%, epsilon: {:.4}",
                    trainer.epsilon()
                );
            }

            let report = trainer.run_episode(episode, env, &mut self.observers)?;

            if report.success {
                successes += 1;
            }
            if report.truncated() {
                truncated += 1;
            }
            reward_sum += report.total_reward;

            for observer in &mut self.observers {
                observer.on_episode_end(&report)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let (success_rate, mean_reward) = if total > 0 {
            (successes as f64 / total as f64, reward_sum / total as f64)
        } else {
            (0.0, 0.0)
        };

        info!(
            trainer = trainer.name(),
            successes,
            total,
            "training completed: {successes} successful episodes ({:.1}%)",
            success_rate * 100.0
        );

        Ok(TrainingResult {
            total_episodes: total,
            successes,
            truncated,
            success_rate,
            mean_reward,
            final_epsilon: trainer.epsilon(),
            table_size: trainer.q_table().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::SimulatedCastle,
        app::GuidedConfig,
        q_learning::GuidedTrainer,
    };

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig {
            num_episodes: 10,
            seed: Some(42),
            log_interval: 0,
        };

        let mut pipeline = TrainingPipeline::new(config);
        let mut trainer = GuidedTrainer::new(GuidedConfig::default()).unwrap();
        let mut env = SimulatedCastle::with_seed(42);

        let result = pipeline.run(&mut trainer, &mut env).unwrap();

        assert_eq!(result.total_episodes, 10);
        assert!(result.successes + result.truncated <= 10);
        assert!(result.table_size > 0);
        assert!(result.final_epsilon < 1.0);
    }
}
