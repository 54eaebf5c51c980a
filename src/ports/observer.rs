//! Observer port - abstraction for training observation and rendering
//!
//! Observers receive training and evaluation events without being able to
//! influence them. The per-step callback doubles as the render hook.

use crate::{Result, ports::environment::Transition, ports::trainer::EpisodeReport};

/// Observer trait for monitoring training and evaluation
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - After every environment step
///    - `on_episode_end(report)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use castle_escape::ports::{EpisodeReport, Observer};
///
/// struct SuccessCounter {
///     successes: usize,
/// }
///
/// impl Observer for SuccessCounter {
///     fn on_episode_end(&mut self, report: &EpisodeReport) -> castle_escape::Result<()> {
///         if report.success {
///             self.successes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the environment has been reset for a new episode.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called once per environment step with the (possibly shaped) transition.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode finishes or is abandoned at the step cap.
    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Forward a step to every observer.
pub fn notify_step(
    observers: &mut [Box<dyn Observer>],
    episode: usize,
    step: usize,
    transition: &Transition,
) -> Result<()> {
    for observer in observers.iter_mut() {
        observer.on_step(episode, step, transition)?;
    }
    Ok(())
}
