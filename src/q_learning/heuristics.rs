//! Exploration biases and reward shaping for the guided trainer
//!
//! Everything here is a pure function of the agent's position, the goal,
//! and the positions visited so far in the episode, so the trainer's
//! stochastic choices can be tested through the weights they sample from.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, distr::Distribution, distr::weighted::WeightedIndex, seq::IndexedRandom};

use crate::{
    app::GuidedConfig,
    types::{ACTION_COUNT, Action, Health, Position},
};

/// Bounded window of the most recently visited rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistory {
    positions: VecDeque<Position>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a room, evicting the oldest once the window is full.
    pub fn push(&mut self, position: Position) {
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(position);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn count(&self, position: Position) -> usize {
        self.positions.iter().filter(|p| **p == position).count()
    }

    /// The latest room in the window that differs from `position`.
    pub fn last_distinct_from(&self, position: Position) -> Option<Position> {
        self.positions.iter().rev().find(|p| **p != position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }
}

impl FromIterator<Position> for PositionHistory {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut history = PositionHistory::new(GuidedConfig::default().history_len);
        for position in iter {
            history.push(position);
        }
        history
    }
}

/// The movement that would walk back toward the room the agent just left,
/// if the current room shows up at least twice in the window.
///
/// The history is expected to already contain the current room.
pub fn retrace_action(history: &PositionHistory, position: Position) -> Option<Action> {
    if history.len() < 3 || history.count(position) < 2 {
        return None;
    }
    let previous = history.last_distinct_from(position)?;
    if previous.row < position.row {
        Some(Action::Up)
    } else if previous.row > position.row {
        Some(Action::Down)
    } else if previous.col < position.col {
        Some(Action::Left)
    } else if previous.col > position.col {
        Some(Action::Right)
    } else {
        None
    }
}

/// Whether a movement strictly reduces the distance to the goal along its axis.
fn approaches_goal(action: Action, position: Position, goal: Position) -> bool {
    match action {
        Action::Up => position.row > goal.row,
        Action::Down => position.row < goal.row,
        Action::Left => position.col > goal.col,
        Action::Right => position.col < goal.col,
        Action::Fight | Action::Hide => false,
    }
}

/// Sampling weights for exploration when no guard shares the room.
///
/// Starts uniform, boosts valid moves toward the goal, damps the move that
/// retraces a detected cycle, and zeroes moves blocked by walls.
pub fn exploration_weights(
    position: Position,
    goal: Position,
    history: &PositionHistory,
    config: &GuidedConfig,
) -> [f64; ACTION_COUNT] {
    let mut weights = [1.0; ACTION_COUNT];

    for action in Action::MOVEMENTS {
        if action.is_valid_at(position) && approaches_goal(action, position, goal) {
            weights[action.index()] = config.goal_bias;
        }
    }

    if let Some(action) = retrace_action(history, position) {
        weights[action.index()] = config.retrace_weight;
    }

    for action in Action::MOVEMENTS {
        if !action.is_valid_at(position) {
            weights[action.index()] = 0.0;
        }
    }

    weights
}

/// FIGHT/HIDE weights when a guard shares the room.
pub fn combat_weights(health: Health, config: &GuidedConfig) -> [f64; 2] {
    if health.is_full() {
        config.healthy_combat_weights
    } else {
        config.wounded_combat_weights
    }
}

/// Draw an action from per-action weights, falling back to a uniform
/// choice among `valid` when every weight is zero.
pub fn sample_weighted<R: Rng + ?Sized>(
    weights: &[f64; ACTION_COUNT],
    valid: &[Action],
    rng: &mut R,
) -> Action {
    match WeightedIndex::new(weights.iter().copied()) {
        Ok(distribution) => Action::ALL[distribution.sample(rng)],
        Err(_) => valid.choose(rng).copied().unwrap_or(Action::Hide),
    }
}

/// One move as seen by the shaping terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStep {
    pub before: Position,
    pub after: Position,
    pub done: bool,
    /// A guard shared the room before the move
    pub guard_present: bool,
}

/// Add progress and revisit shaping terms to an environment reward.
///
/// Shaping only applies to non-terminal steps taken without a guard in the
/// room before the step. `visited` holds every room entered earlier in the
/// episode, including the pre-step room.
pub fn shaped_reward(
    reward: f64,
    step: &RoomStep,
    goal: Position,
    visited: &HashSet<Position>,
    config: &GuidedConfig,
) -> f64 {
    if step.done || step.guard_present {
        return reward;
    }
    let mut shaped = reward;
    if step.after.manhattan(goal) < step.before.manhattan(goal) {
        shaped += config.progress_bonus;
    }
    if visited.contains(&step.after) {
        shaped -= config.revisit_penalty;
    }
    shaped
}
