//! Tabular Q-learning for the Castle Escape MDP
//!
//! Two trainers share the state encoder and the [`QTable`]:
//!
//! | Aspect | Baseline | Guided |
//! |--------|----------|--------|
//! | Learning rate | `1/(1+n)` per state-action | fixed α |
//! | Exploration | uniform over all six actions | goal-biased, cycle-aware, guard-aware |
//! | Exploitation | plain argmax | wall-masked argmax, FIGHT/HIDE with a guard |
//! | Reward | environment reward | shaped for progress and revisits |
//! | Episode length | until terminal | capped at `max_steps` |
//!
//! ## Usage Example
//!
//! ```no_run
//! use castle_escape::app::{BaselineConfig, GuidedConfig};
//! use castle_escape::q_learning::{BaselineTrainer, GuidedTrainer};
//!
//! let baseline = BaselineTrainer::new(&BaselineConfig::default().with_seed(1))?;
//! let guided = GuidedTrainer::new(GuidedConfig::default().with_seed(1))?;
//! # Ok::<(), castle_escape::Error>(())
//! ```

pub mod baseline;
pub mod guided;
pub mod heuristics;
pub mod q_table;
pub mod serialization;
pub mod visits;

use rand::{SeedableRng, rngs::StdRng};

pub use baseline::BaselineTrainer;
pub use guided::GuidedTrainer;
pub use heuristics::PositionHistory;
pub use q_table::{ActionValues, QTable};
pub use serialization::{SavedQTable, TrainerKind, TrainingMetadata};
pub use visits::VisitCounter;

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}
