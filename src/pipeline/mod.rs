//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training either trainer for a fixed number of episodes
//! - Evaluating a learned table greedily
//! - Recording observations during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationReport, GreedyEvaluator};
pub use observers::{
    ConsoleRenderer, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, StepRecord,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Observer, Trainer};
