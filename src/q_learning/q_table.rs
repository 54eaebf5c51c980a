//! Action-value store for tabular learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    encoding::StateIndex,
    types::{ACTION_COUNT, Action},
    utils::{argmax, max_value},
};

/// One value per action, in `Action::ALL` order.
pub type ActionValues = [f64; ACTION_COUNT];

/// Q-table mapping state indices to action values.
///
/// Rows are created lazily as all-zero vectors the first time a state is
/// touched through [`QTable::get`]. Rows are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<StateIndex, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the row for a state, inserting a zero row if it was unseen.
    pub fn get(&mut self, state: StateIndex) -> &ActionValues {
        self.values.entry(state).or_insert([0.0; ACTION_COUNT])
    }

    /// Read-only lookup; `None` for states never visited.
    pub fn lookup(&self, state: StateIndex) -> Option<&ActionValues> {
        self.values.get(&state)
    }

    /// Overwrite a single action value.
    pub fn update(&mut self, state: StateIndex, action: Action, value: f64) {
        self.values.entry(state).or_insert([0.0; ACTION_COUNT])[action.index()] = value;
    }

    /// Value of one state-action pair, creating the row if needed.
    pub fn value(&mut self, state: StateIndex, action: Action) -> f64 {
        self.get(state)[action.index()]
    }

    /// `max_a Q(state, a)`, creating the row if needed.
    pub fn max_q(&mut self, state: StateIndex) -> f64 {
        max_value(self.get(state))
    }

    /// Greedy action over all six columns (lowest index wins ties).
    pub fn greedy_action(&mut self, state: StateIndex) -> Action {
        Action::ALL[argmax(self.get(state))]
    }

    /// Number of states with a row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate rows in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = (StateIndex, &ActionValues)> {
        let mut rows: Vec<_> = self.values.iter().map(|(k, v)| (*k, v)).collect();
        rows.sort_by_key(|(k, _)| *k);
        rows.into_iter()
    }
}
