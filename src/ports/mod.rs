//! Ports (trait boundaries) for external collaborators.
//!
//! The environment, persistence, and observation are owned by the domain
//! as traits and implemented by adapters.

pub mod environment;
pub mod observer;
pub mod repository;
pub mod trainer;

pub use environment::{Environment, StepInfo, Transition};
pub use observer::{Observer, notify_step};
pub use repository::TableRepository;
pub use trainer::{EpisodeReport, Trainer};
