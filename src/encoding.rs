//! State encoder: observation -> table index.
//!
//! The index packs every observable component with mixed radix
//! `row·75 + col·15 + health·5 + guard_code`, giving 375 distinct states.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{GRID_SIZE, Observation};

const GUARD_RADIX: usize = 5;
const HEALTH_RADIX: usize = 3;
const COL_STRIDE: usize = HEALTH_RADIX * GUARD_RADIX;
const ROW_STRIDE: usize = GRID_SIZE * COL_STRIDE;

/// Total number of encodable states.
pub const STATE_COUNT: usize = GRID_SIZE * ROW_STRIDE;

/// Index of an encoded state in `[0, 375)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateIndex(usize);

impl StateIndex {
    /// Wrap a raw index, rejecting anything outside the state universe.
    pub fn new(value: usize) -> Option<Self> {
        (value < STATE_COUNT).then_some(StateIndex(value))
    }

    pub fn value(self) -> usize {
        self.0
    }

    /// Unpack into `(row, col, health, guard_code)`.
    pub fn components(self) -> (usize, usize, usize, usize) {
        (
            self.0 / ROW_STRIDE,
            self.0 % ROW_STRIDE / COL_STRIDE,
            self.0 % COL_STRIDE / GUARD_RADIX,
            self.0 % GUARD_RADIX,
        )
    }
}

impl From<StateIndex> for usize {
    fn from(index: StateIndex) -> Self {
        index.0
    }
}

impl fmt::Display for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode raw components. Callers guarantee `row, col < 5`, `health < 3`
/// and `guard_code < 5`.
pub fn encode_components(row: usize, col: usize, health: usize, guard_code: usize) -> StateIndex {
    debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
    debug_assert!(health < HEALTH_RADIX && guard_code < GUARD_RADIX);
    StateIndex(row * ROW_STRIDE + col * COL_STRIDE + health * GUARD_RADIX + guard_code)
}

/// Encode an observation into its table index.
pub fn encode(observation: &Observation) -> StateIndex {
    let guard_code = observation
        .guard_in_cell
        .map_or(0, |guard| usize::from(guard.code()));
    encode_components(
        observation.player_position.row,
        observation.player_position.col,
        observation.player_health.ordinal(),
        guard_code,
    )
}
