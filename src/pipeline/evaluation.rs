//! Greedy evaluation of a trained Q-table
//!
//! The evaluator replays the learned policy without exploration, shaping,
//! or masking. It never writes to the table: a state missing from the
//! table is reported as [`Error::MissingState`] instead of being zero-filled.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    encoding::encode,
    ports::{EpisodeReport, Environment, Observer, notify_step},
    q_learning::QTable,
    types::{Action, TerminalKind},
    utils::argmax,
};

/// Outcome of one greedy episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total_reward: f64,
    pub steps: usize,
    /// Terminated with strictly positive total reward
    pub success: bool,
    /// Stopped at the step limit before the environment terminated
    pub truncated: bool,
    pub terminal: Option<TerminalKind>,
}

/// Runs a single episode following `argmax Q(s, ·)` over all six actions.
#[derive(Debug, Clone, Copy)]
pub struct GreedyEvaluator<'a> {
    table: &'a QTable,
    max_steps: Option<usize>,
}

impl<'a> GreedyEvaluator<'a> {
    /// Evaluator with no step limit: it runs until the environment terminates.
    pub fn new(table: &'a QTable) -> Self {
        Self {
            table,
            max_steps: None,
        }
    }

    /// Stop after at most `max_steps` steps and report the run as truncated.
    pub fn with_step_limit(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Greedy action for an observation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingState`] if the table has no row for the state.
    pub fn action_for(&self, observation: &crate::types::Observation) -> Result<Action> {
        let state = encode(observation);
        let row = self
            .table
            .lookup(state)
            .ok_or(Error::MissingState {
                index: state.value(),
            })?;
        Ok(Action::ALL[argmax(row)])
    }

    /// Play one episode.
    ///
    /// Observers get `on_episode_start`, every step, and an `on_episode_end`
    /// report with epsilon 0.
    ///
    /// # Errors
    ///
    /// [`Error::MissingState`] when the policy reaches an unseen state, plus
    /// any environment or observer failure.
    pub fn run(
        &self,
        env: &mut dyn Environment,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EvaluationReport> {
        for observer in observers.iter_mut() {
            observer.on_episode_start(0)?;
        }

        let mut transition = env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        while !transition.done {
            if self.max_steps.is_some_and(|limit| steps >= limit) {
                break;
            }
            let action = self.action_for(&transition.observation)?;
            transition = env.step(action)?;
            total_reward += transition.reward;
            notify_step(observers, 0, steps, &transition)?;
            steps += 1;
        }

        let done = transition.done;
        let report = EvaluationReport {
            total_reward,
            steps,
            success: done && total_reward > 0.0,
            truncated: !done,
            terminal: if done { env.is_terminal() } else { None },
        };

        let episode = EpisodeReport {
            episode: 0,
            total_reward,
            steps,
            terminated: done,
            terminal: report.terminal,
            success: report.success,
            epsilon: 0.0,
        };
        for observer in observers.iter_mut() {
            observer.on_episode_end(&episode)?;
        }

        debug!(steps, total_reward, "greedy episode finished");
        if report.truncated {
            info!(steps, "evaluation stopped at the step limit");
        }

        Ok(report)
    }
}
