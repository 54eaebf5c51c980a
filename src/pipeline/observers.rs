//! Observers for training and evaluation runs
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{EpisodeReport, Observer, Transition},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        if report.success {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.episode as u64 + 1);
            pb.set_message(format!("ok:{} eps:{:.3}", self.successes, report.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("ok:{}", self.successes));
        }
        Ok(())
    }
}

/// Metrics observer - Keeps every episode report
#[derive(Debug, Default)]
pub struct MetricsObserver {
    reports: Vec<EpisodeReport>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[EpisodeReport] {
        &self.reports
    }

    /// Exploration rate used in each episode, in order.
    pub fn epsilon_trace(&self) -> Vec<f64> {
        self.reports.iter().map(|r| r.epsilon).collect()
    }

    pub fn success_rate(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.reports.iter().filter(|r| r.success).count() as f64 / self.reports.len() as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.reports.iter().map(|r| r.steps).sum::<usize>() as f64 / self.reports.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.reports.len(),
            successes: self.reports.iter().filter(|r| r.success).count(),
            truncated: self.reports.iter().filter(|r| r.truncated()).count(),
            success_rate: self.success_rate(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub successes: usize,
    pub truncated: usize,
    pub success_rate: f64,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// One line of a JSONL step trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub episode: usize,
    pub step: usize,
    #[serde(flatten)]
    pub transition: Transition,
}

/// JSONL observer - Writes every step as one JSON object per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_step(&mut self, episode: usize, step: usize, transition: &Transition) -> Result<()> {
        let record = StepRecord {
            episode,
            step,
            transition: transition.clone(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Text render hook: prints one status line per step.
pub struct ConsoleRenderer {
    /// Only render episodes whose index is a multiple of this (1 = all)
    every: usize,
}

impl ConsoleRenderer {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }

    /// Status line for a single step.
    pub fn format_step(transition: &Transition) -> String {
        let obs = &transition.observation;
        let guard = obs
            .guard_in_cell
            .map_or_else(|| "None".to_string(), |g| g.to_string());
        let action = transition
            .info
            .action
            .map_or_else(|| "None".to_string(), |a| a.to_string());
        let mut line = format!(
            "Pos: {}, Health: {}, Guard In Cell: {}, Reward: {}, Action: {}",
            obs.player_position, obs.player_health, guard, transition.reward, action
        );
        if let Some(event) = &transition.info.event {
            line.push_str(&format!(" ({event})"));
        }
        line
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Observer for ConsoleRenderer {
    fn on_step(&mut self, episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        if episode % self.every == 0 {
            println!("{}", Self::format_step(transition));
        }
        Ok(())
    }
}
