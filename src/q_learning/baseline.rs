//! Visit-count weighted Q-learning with plain ε-greedy exploration
//!
//! Each state-action pair keeps its own learning rate `η = 1/(1+n)`, so the
//! update `Q ← (1-η)Q + η(r + γ max Q(s'))` is a running average of its
//! targets. Episodes run until the environment terminates them.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{QTable, TrainerKind, VisitCounter, build_rng};
use crate::{
    Result,
    app::BaselineConfig,
    encoding::{StateIndex, encode},
    ports::{EpisodeReport, Environment, Observer, Trainer, notify_step},
    types::Action,
    utils::decayed_epsilon,
};

/// Baseline trainer: harmonic per-pair learning rate, no shaping, no step cap.
#[derive(Debug, Clone)]
pub struct BaselineTrainer {
    q_table: QTable,
    visits: VisitCounter,
    discount_factor: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
}

impl BaselineTrainer {
    /// Create a trainer with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range values.
    pub fn new(config: &BaselineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            visits: VisitCounter::new(),
            discount_factor: config.discount_factor,
            epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            min_epsilon: config.min_epsilon,
            rng: build_rng(config.seed),
        })
    }

    /// Apply one visit-weighted update and count the visit.
    ///
    /// Returns the new value of `Q(state, action)`.
    pub fn update(
        &mut self,
        state: StateIndex,
        action: Action,
        reward: f64,
        next_state: StateIndex,
    ) -> f64 {
        let max_next = self.q_table.max_q(next_state);
        let eta = self.visits.learning_rate(state, action);
        let current = self.q_table.value(state, action);
        let target = reward + self.discount_factor * max_next;
        let new_q = (1.0 - eta) * current + eta * target;
        self.q_table.update(state, action, new_q);
        self.visits.increment(state, action);
        new_q
    }

    pub fn visits(&self) -> &VisitCounter {
        &self.visits
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    fn select_action(&mut self, env: &mut dyn Environment, state: StateIndex) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            env.sample_action()
        } else {
            self.q_table.greedy_action(state)
        }
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = decayed_epsilon(self.epsilon, self.epsilon_decay, self.min_epsilon);
    }
}

impl Trainer for BaselineTrainer {
    fn run_episode(
        &mut self,
        episode: usize,
        env: &mut dyn Environment,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeReport> {
        let epsilon = self.epsilon;
        let start = env.reset()?;
        let mut state = encode(&start.observation);
        let mut done = start.done;
        let mut total_reward = 0.0;
        let mut steps = 0;

        while !done {
            self.q_table.get(state);
            let action = self.select_action(env, state);

            let transition = env.step(action)?;
            let next_state = encode(&transition.observation);
            self.q_table.get(next_state);

            self.update(state, action, transition.reward, next_state);

            total_reward += transition.reward;
            notify_step(observers, episode, steps, &transition)?;
            steps += 1;

            done = transition.done;
            state = next_state;
        }

        self.decay_epsilon();

        let report = EpisodeReport {
            episode,
            total_reward,
            steps,
            terminated: true,
            terminal: env.is_terminal(),
            success: total_reward > 0.0,
            epsilon,
        };
        debug!(
            episode,
            steps,
            total_reward,
            epsilon,
            table_size = self.q_table.len(),
            "baseline episode finished"
        );
        Ok(report)
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Baseline
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
