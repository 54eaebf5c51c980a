//! Trainer configuration and the [`App`] container.
//!
//! `App` holds the table repository and a default seed. Commands ask it for
//! a configured trainer, run the pipeline, then hand the finished table
//! back through [`App::snapshot`] and [`App::save_table`]. Tests swap in an
//! [`InMemoryRepository`](crate::adapters::InMemoryRepository) via
//! [`App::for_testing`].

pub mod config;
pub mod container;

pub use config::{BaselineConfig, GuidedConfig};
pub use container::{App, AppBuilder};
