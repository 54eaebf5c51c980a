//! Trainer port - abstraction over the two learning algorithms
//!
//! Both the visit-count baseline and the heuristic-guided trainer run one
//! episode at a time against an [`Environment`] and own their Q-table for
//! the lifetime of the training run.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Environment, Observer},
    q_learning::{QTable, TrainerKind},
    types::TerminalKind,
};

/// Summary of a single training episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Episode index (0-based)
    pub episode: usize,
    /// Accumulated (shaped, where applicable) reward
    pub total_reward: f64,
    /// Environment steps taken
    pub steps: usize,
    /// Whether the environment signalled termination
    pub terminated: bool,
    /// How the environment says the episode ended
    pub terminal: Option<TerminalKind>,
    /// Terminated with strictly positive total reward
    pub success: bool,
    /// Exploration rate used during the episode
    pub epsilon: f64,
}

impl EpisodeReport {
    /// Episode abandoned at a step cap rather than ended by the environment.
    pub fn truncated(&self) -> bool {
        !self.terminated
    }
}

/// Trainer trait - one tabular learner driven episode by episode
pub trait Trainer: Send {
    /// Run one full episode, updating the Q-table and decaying epsilon at
    /// the end. Observers receive every step.
    ///
    /// # Errors
    ///
    /// Propagates environment and observer failures; no retries are made and
    /// updates applied before the failure are kept.
    fn run_episode(
        &mut self,
        episode: usize,
        env: &mut dyn Environment,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeReport>;

    /// Current exploration rate.
    fn epsilon(&self) -> f64;

    /// The table learned so far.
    fn q_table(&self) -> &QTable;

    /// Which algorithm this trainer implements.
    fn kind(&self) -> TrainerKind;

    /// Reseed the exploration RNG.
    fn set_rng_seed(&mut self, seed: u64);

    fn name(&self) -> &str {
        match self.kind() {
            TrainerKind::Baseline => "Baseline Q-learning",
            TrainerKind::Guided => "Heuristic-guided Q-learning",
        }
    }
}
