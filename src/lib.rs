//! Castle Escape tabular reinforcement learning
//!
//! This crate provides:
//! - A state encoder mapping observations to 375 table indices
//! - A visit-count baseline Q-learning trainer
//! - A heuristic-guided Q-learning trainer with reward shaping
//! - Greedy evaluation of saved tables
//! - A seeded simulated castle for running everything end to end

pub mod adapters;
pub mod app;
pub mod cli;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use encoding::{STATE_COUNT, StateIndex, encode};
pub use error::{Error, Result};
pub use types::{Action, GuardId, Health, Observation, Position};
