//! Per state-action visit counts for harmonic learning-rate decay

use serde::{Deserialize, Serialize};

use crate::{
    encoding::{STATE_COUNT, StateIndex},
    types::{ACTION_COUNT, Action},
};

/// Dense visit counter over the full 375 x 6 state-action space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCounter {
    counts: Vec<[u64; ACTION_COUNT]>,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self {
            counts: vec![[0; ACTION_COUNT]; STATE_COUNT],
        }
    }

    pub fn visits(&self, state: StateIndex, action: Action) -> u64 {
        self.counts[state.value()][action.index()]
    }

    /// `eta = 1 / (1 + n)` for the pair's current visit count.
    pub fn learning_rate(&self, state: StateIndex, action: Action) -> f64 {
        1.0 / (1.0 + self.visits(state, action) as f64)
    }

    pub fn increment(&mut self, state: StateIndex, action: Action) {
        self.counts[state.value()][action.index()] += 1;
    }

    /// Sum of all recorded updates.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

impl Default for VisitCounter {
    fn default() -> Self {
        Self::new()
    }
}
