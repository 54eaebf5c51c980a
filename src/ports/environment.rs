//! Environment port - the Castle Escape MDP as seen by the trainers
//!
//! The transition and reward model lives behind this trait. Trainers and
//! the evaluator only reset, step, and query the goal and terminal status.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    types::{Action, Health, Observation, Position, TerminalKind, WorldState},
};

/// Auxiliary information attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Action the environment executed, if any
    pub action: Option<Action>,
    /// Free-form description of what happened (combat result, slip, ...)
    pub event: Option<String>,
}

/// Result of `reset` or `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Environment trait consumed by trainers and the evaluator.
///
/// Implementations handle boundary-invalid moves themselves (e.g. as a
/// no-op); trainers may issue any of the six actions.
pub trait Environment {
    /// Start a new episode. The returned reward is ignored and `done` is false.
    fn reset(&mut self) -> Result<Transition>;

    /// Advance the environment by one action.
    fn step(&mut self, action: Action) -> Result<Transition>;

    /// Uniformly random action over all six actions.
    fn sample_action(&mut self) -> Action;

    /// Fixed goal room.
    fn goal_room(&self) -> Position;

    /// Full snapshot, including every guard's position.
    fn current_state(&self) -> WorldState;

    /// How the episode ended, or `None` while it is still running.
    fn is_terminal(&self) -> Option<TerminalKind>;

    /// Display label for a health ordinal.
    fn health_label(&self, health: Health) -> &'static str {
        health.label()
    }
}
